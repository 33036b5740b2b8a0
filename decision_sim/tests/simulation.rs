use chrono::NaiveDate;
use decision_sim::signals::{DetectorOutput, SignalBundle};
use decision_sim::simulate::{
    Intervention, PartnerInput, SimulationEngine, SimulationInput,
};
use decision_sim::{recommend, simulation_summary, Recommendation, SimError};
use demand_forecast::models::seasonal_smoothing::SeasonalSmoothing;
use demand_forecast::{ForecastProvider, SalesHistory};
use pretty_assertions::assert_eq;
use retail_data::synthetic::flat_series;
use retail_data::Product;
use rstest::rstest;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn flat_history(days: usize, level: f64) -> SalesHistory {
    SalesHistory::from_observations(flat_series(start(), days, level)).unwrap()
}

fn engine() -> SimulationEngine<SeasonalSmoothing> {
    SimulationEngine::new(ForecastProvider::new(SeasonalSmoothing::weekly()))
}

fn product(stock: u32) -> Product {
    Product::new("sku-1", "Coffee", "beverages", 4.0, 10.0, stock, 7).unwrap()
}

#[test]
fn neutral_intervention_reproduces_the_baseline() {
    let engine = engine();
    let product = product(500);
    let history = flat_history(60, 10.0);
    let bundle = SignalBundle::neutral(&product.id);

    let input = SimulationInput {
        product: &product,
        history: &history,
        bundle: &bundle,
        partners: &[],
    };
    let result = engine.simulate(input, Intervention::none(), 7).unwrap();

    assert_eq!(result.baseline.points, result.counterfactual.points);
    assert_eq!(result.profit_delta, 0.0);
    assert_eq!(result.stockout_probability_delta, 0.0);
}

#[test]
fn price_increase_with_elastic_demand_cuts_volume() {
    // 60 flat days at 10/day, +10% price at elasticity -1.2:
    // adjusted daily demand is 10 * (1 - 0.12) = 8.8
    let engine = engine();
    let product = product(1000);
    let history = flat_history(60, 10.0);
    let bundle =
        SignalBundle::aggregate(&product.id, [DetectorOutput::PriceElasticity(-1.2)]);

    let input = SimulationInput {
        product: &product,
        history: &history,
        bundle: &bundle,
        partners: &[],
    };
    let result = engine
        .simulate(input, Intervention::price_change(0.10), 7)
        .unwrap();

    for point in &result.counterfactual.points {
        assert!(
            (point.estimate - 8.8).abs() < 0.05,
            "expected ~8.8 units/day, got {}",
            point.estimate
        );
    }

    // Price up, volume down: both effects must show in the profit delta,
    // and the sign must match the computed projections
    let margin_before = 10.0 - 4.0;
    let margin_after = 11.0 - 4.0;
    let expected_delta = 8.8 * 7.0 * margin_after - 10.0 * 7.0 * margin_before;
    assert!((result.profit_delta - expected_delta).abs() < 2.0);
}

#[rstest]
#[case(-0.95)]
#[case(5.5)]
fn out_of_range_price_delta_is_rejected(#[case] delta: f64) {
    let engine = engine();
    let product = product(100);
    let history = flat_history(60, 10.0);
    let bundle = SignalBundle::neutral(&product.id);

    let input = SimulationInput {
        product: &product,
        history: &history,
        bundle: &bundle,
        partners: &[],
    };
    let result = engine.simulate(input, Intervention::price_change(delta), 7);

    assert!(matches!(result, Err(SimError::Validation(_))));
}

#[test]
fn destock_below_zero_is_rejected() {
    let engine = engine();
    let product = product(30);
    let history = flat_history(60, 10.0);
    let bundle = SignalBundle::neutral(&product.id);

    let input = SimulationInput {
        product: &product,
        history: &history,
        bundle: &bundle,
        partners: &[],
    };
    let result = engine.simulate(input, Intervention::restock(-31), 7);

    assert!(matches!(result, Err(SimError::Validation(_))));
}

#[test]
fn raising_price_never_raises_demand() {
    let engine = engine();
    let product = product(10_000);
    let history = flat_history(60, 10.0);
    let bundle = SignalBundle::neutral(&product.id);

    let mut previous_total = f64::INFINITY;
    for delta in [0.0, 0.1, 0.25, 0.5, 1.0] {
        let input = SimulationInput {
            product: &product,
            history: &history,
            bundle: &bundle,
            partners: &[],
        };
        let result = engine
            .simulate(input, Intervention::price_change(delta), 7)
            .unwrap();
        let total = result.counterfactual.cumulative_estimate(7);

        assert!(
            total <= previous_total + 1e-9,
            "demand rose from {} to {} when price delta moved to {}",
            previous_total,
            total,
            delta
        );
        previous_total = total;
    }
}

#[test]
fn restocking_never_lowers_the_ceiling() {
    let engine = engine();
    // Tiny stock so the ceiling binds
    let product = product(3);
    let history = flat_history(60, 10.0);
    let bundle = SignalBundle::neutral(&product.id);

    let mut previous_total = 0.0;
    for delta in [0i64, 20, 50, 200] {
        let input = SimulationInput {
            product: &product,
            history: &history,
            bundle: &bundle,
            partners: &[],
        };
        let result = engine
            .simulate(input, Intervention::restock(delta), 7)
            .unwrap();
        let total = result.counterfactual.cumulative_estimate(7);

        assert!(
            total >= previous_total - 1e-9,
            "sellable demand fell from {} to {} when restocking {}",
            previous_total,
            total,
            delta
        );
        previous_total = total;
    }
}

#[test]
fn restocking_relieves_stockout_probability() {
    let engine = engine();
    let product = product(40);
    let history = flat_history(60, 10.0);
    let bundle = SignalBundle::neutral(&product.id);

    let input = SimulationInput {
        product: &product,
        history: &history,
        bundle: &bundle,
        partners: &[],
    };
    let result = engine.simulate(input, Intervention::restock(100), 7).unwrap();

    assert!(result.stockout_probability_delta <= 0.0);
}

#[test]
fn promotion_lifts_demand_by_the_configured_constant() {
    let engine = engine();
    let product = product(10_000);
    let history = flat_history(60, 10.0);
    let bundle = SignalBundle::neutral(&product.id);

    let input = SimulationInput {
        product: &product,
        history: &history,
        bundle: &bundle,
        partners: &[],
    };
    let result = engine.simulate(input, Intervention::promotion(), 7).unwrap();

    for (base, cf) in result
        .baseline
        .points
        .iter()
        .zip(&result.counterfactual.points)
    {
        assert!((cf.estimate - base.estimate * 1.15).abs() < 1e-6);
    }
}

#[test]
fn synergy_ripples_to_partners_once() {
    let engine = engine();
    let product = product(1000);
    let history = flat_history(60, 10.0);

    let partner_product =
        Product::new("sku-2", "Filters", "beverages", 1.0, 3.0, 500, 7).unwrap();
    let partner_history = flat_history(60, 20.0);

    let bundle = SignalBundle::aggregate(
        &product.id,
        [
            DetectorOutput::PriceElasticity(-1.0),
            DetectorOutput::SynergyLift {
                partner: partner_product.id.clone(),
                lift: 0.5,
            },
        ],
    );

    let partners = [PartnerInput {
        product: &partner_product,
        history: &partner_history,
    }];
    let input = SimulationInput {
        product: &product,
        history: &history,
        bundle: &bundle,
        partners: &partners,
    };

    // Price drop stimulates the product and, scaled by the lift, the partner
    let result = engine
        .simulate(input, Intervention::price_change(-0.10), 7)
        .unwrap();

    assert_eq!(result.synergy_effects.len(), 1);
    let impact = &result.synergy_effects[0];
    assert_eq!(impact.product_id, "sku-2");
    assert!(impact.demand_delta_units > 0.0);
    assert!(impact.profit_delta() > 0.0);
}

#[test]
fn cyclic_synergy_terminates_at_depth_one() {
    // The product lifts a partner whose obvious counterpart edge points
    // straight back. The partner pass runs the adjustment pipeline without
    // a synergy stage, so the cycle produces exactly one ripple.
    let engine = engine();
    let product = product(1000);
    let history = flat_history(60, 10.0);

    let bundle = SignalBundle::aggregate(
        &product.id,
        [DetectorOutput::SynergyLift {
            partner: product.id.clone(),
            lift: 0.5,
        }],
    );

    let partners = [PartnerInput {
        product: &product,
        history: &history,
    }];
    let input = SimulationInput {
        product: &product,
        history: &history,
        bundle: &bundle,
        partners: &partners,
    };

    let result = engine
        .simulate(input, Intervention::price_change(-0.10), 7)
        .unwrap();

    assert_eq!(result.synergy_effects.len(), 1);
}

#[test]
fn partners_without_catalog_data_are_skipped() {
    let engine = engine();
    let product = product(1000);
    let history = flat_history(60, 10.0);
    let bundle = SignalBundle::aggregate(
        &product.id,
        [DetectorOutput::SynergyLift {
            partner: "sku-unknown".to_string(),
            lift: 0.5,
        }],
    );

    let input = SimulationInput {
        product: &product,
        history: &history,
        bundle: &bundle,
        partners: &[],
    };
    let result = engine
        .simulate(input, Intervention::price_change(-0.10), 7)
        .unwrap();

    assert!(result.synergy_effects.is_empty());
}

#[test]
fn short_history_marks_the_result_low_confidence() {
    let engine = engine();
    let product = product(100);
    let history = flat_history(6, 10.0);
    let bundle = SignalBundle::neutral(&product.id);

    let input = SimulationInput {
        product: &product,
        history: &history,
        bundle: &bundle,
        partners: &[],
    };
    let result = engine.simulate(input, Intervention::price_change(0.05), 7).unwrap();

    assert!(result.low_confidence);
}

#[test]
fn results_serialize_for_the_request_layer() {
    let engine = engine();
    let product = product(500);
    let history = flat_history(60, 10.0);
    let bundle = SignalBundle::neutral(&product.id);

    let input = SimulationInput {
        product: &product,
        history: &history,
        bundle: &bundle,
        partners: &[],
    };
    let result = engine
        .simulate(input, Intervention::price_change(0.10), 7)
        .unwrap();

    let json = serde_json::to_string(&result).unwrap();
    assert!(json.contains("\"profit_delta\""));
    assert!(json.contains("\"price_delta_pct\":0.1"));
}

#[test]
fn summary_and_recommendation_follow_the_profit_sign() {
    let engine = engine();
    let product = product(10_000);
    let history = flat_history(60, 10.0);
    let bundle = SignalBundle::neutral(&product.id);

    // Neutral elasticity: +20% price loses 20% of volume, but the richer
    // margin wins on these unit economics
    let input = SimulationInput {
        product: &product,
        history: &history,
        bundle: &bundle,
        partners: &[],
    };
    let result = engine
        .simulate(input, Intervention::price_change(0.20), 7)
        .unwrap();

    assert!(result.profit_delta > 0.0);
    assert_eq!(recommend(&result), Recommendation::Apply);

    let text = simulation_summary(&product, &result);
    assert!(text.contains("raises"));
    assert!(text.contains("APPLY"));
}
