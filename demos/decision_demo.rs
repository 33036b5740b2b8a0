//! End-to-end demo: build a small catalog, forecast, classify risk, and
//! run a few what-if simulations.
//!
//! Run with `cargo run --example decision_demo` (set `RUST_LOG=debug` to
//! watch fallback and cache behaviour).

use chrono::NaiveDate;
use decision_sim::{DetectorOutput, Intervention, SignalBundle};
use demand_forecast::SalesHistory;
use retail_data::synthetic::{generate_demand_series, DemandProfile};
use retail_data::Product;
use stockcast::DecisionSupport;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("invalid start date")?;
    let mut desk = DecisionSupport::new();

    // A small grocery catalog with different demand shapes
    let catalog = [
        ("sku-coffee", "Coffee", 5.0, 9.5, 45u32, DemandProfile {
            base_level: 30.0,
            weekly_amplitude: 0.35,
            daily_trend: 0.08,
            noise: 3.0,
        }),
        ("sku-milk", "Milk", 1.2, 2.1, 400, DemandProfile {
            base_level: 80.0,
            weekly_amplitude: 0.15,
            daily_trend: -0.05,
            noise: 6.0,
        }),
        ("sku-filters", "Filters", 0.8, 2.4, 120, DemandProfile {
            base_level: 12.0,
            weekly_amplitude: 0.3,
            daily_trend: 0.02,
            noise: 1.5,
        }),
    ];

    for (i, (id, name, cost, price, stock, profile)) in catalog.into_iter().enumerate() {
        let product = Product::new(id, name, "grocery", cost, price, stock, 5)?;
        let series = generate_demand_series(start, 120, &profile, 40 + i as u64)?;
        desk.register(product, SalesHistory::from_observations(series)?);
    }

    // Coffee sales pull filter sales along
    desk.set_signals(SignalBundle::aggregate(
        "sku-coffee",
        [
            DetectorOutput::PriceElasticity(-1.3),
            DetectorOutput::SynergyLift {
                partner: "sku-filters".to_string(),
                lift: 0.4,
            },
        ],
    ));

    println!("=== Risk overview ===");
    for id in desk.product_ids() {
        println!("{}", desk.risk_report(&id)?);
    }

    println!("\n=== 14-day forecast: Coffee ===");
    let forecast = desk.forecast("sku-coffee", 14)?;
    log::info!(
        "coffee forecast produced by {} (low confidence: {})",
        forecast.model,
        forecast.low_confidence
    );
    for point in &forecast.points {
        println!(
            "{}  {:6.1}  [{:6.1}, {:6.1}]",
            point.date, point.estimate, point.lower, point.upper
        );
    }
    println!(
        "summary: {}",
        serde_json::to_string(&desk.forecast_summary("sku-coffee", 14)?)?
    );

    println!("\n=== What-if: Coffee ===");
    for (label, intervention) in [
        ("raise price 10%", Intervention::price_change(0.10)),
        ("run a promotion", Intervention::promotion()),
        ("restock +200 units", Intervention::restock(200)),
    ] {
        println!("-- {}", label);
        let result = desk.simulate("sku-coffee", intervention, 14)?;
        println!(
            "   profit {:+.2}, stockout probability {:+.1} points",
            result.profit_delta,
            result.stockout_probability_delta * 100.0
        );
        for impact in &result.synergy_effects {
            println!(
                "   ripple -> {}: profit {:+.2}, demand {:+.1} units",
                impact.product_id,
                impact.profit_delta(),
                impact.demand_delta_units
            );
        }
        println!("   {}", desk.simulation_report("sku-coffee", intervention, 14)?);
    }

    Ok(())
}
