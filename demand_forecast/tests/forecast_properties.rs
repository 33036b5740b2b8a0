use chrono::NaiveDate;
use demand_forecast::models::seasonal_smoothing::SeasonalSmoothing;
use demand_forecast::{ForecastPolicy, ForecastProvider, SalesHistory};
use pretty_assertions::assert_eq;
use retail_data::synthetic::{generate_demand_series, DemandProfile};
use retail_data::DailySales;
use rstest::rstest;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn synthetic_history(days: usize, seed: u64) -> SalesHistory {
    let profile = DemandProfile {
        base_level: 25.0,
        weekly_amplitude: 0.3,
        daily_trend: 0.05,
        noise: 3.0,
    };
    let series = generate_demand_series(start(), days, &profile, seed).unwrap();
    SalesHistory::from_observations(series).unwrap()
}

#[rstest]
#[case(14)]
#[case(60)]
#[case(180)]
fn estimates_are_non_negative_and_bracketed(#[case] days: usize) {
    let provider = ForecastProvider::new(SeasonalSmoothing::weekly());
    let history = synthetic_history(days, 11);

    let forecast = provider.forecast("sku-1", &history, 14).unwrap();

    assert_eq!(forecast.points.len(), 14);
    for point in &forecast.points {
        assert!(point.estimate >= 0.0);
        assert!(point.lower >= 0.0);
        assert!(point.lower <= point.estimate);
        assert!(point.estimate <= point.upper);
    }
}

#[test]
fn forecasting_twice_is_deterministic() {
    let provider = ForecastProvider::new(SeasonalSmoothing::weekly());
    let history = synthetic_history(90, 5);

    let a = provider.forecast("sku-1", &history, 10).unwrap();
    let b = provider.forecast("sku-1", &history, 10).unwrap();

    assert_eq!(a.points, b.points);
    assert_eq!(a.low_confidence, b.low_confidence);
}

#[test]
fn sparse_history_is_repaired_before_fitting() {
    // A series with weekend gaps: the provider should treat missing days
    // as zero sales, not skip them
    let observations: Vec<DailySales> = (0..40)
        .filter(|i| i % 7 != 5 && i % 7 != 6)
        .map(|i| DailySales {
            date: start() + chrono::Duration::days(i),
            quantity: 12.0,
        })
        .collect();
    let history = SalesHistory::from_observations(observations).unwrap();

    let provider = ForecastProvider::new(SeasonalSmoothing::weekly());
    let forecast = provider.forecast("sku-1", &history, 7).unwrap();

    // Two of the seven projected days fall on the zero-sales positions
    let low_days = forecast
        .points
        .iter()
        .filter(|p| p.estimate < 6.0)
        .count();
    assert_eq!(low_days, 2);
}

#[test]
fn short_series_yields_low_confidence_flat_line() {
    let history = synthetic_history(8, 3);
    let provider = ForecastProvider::new(SeasonalSmoothing::weekly());

    let forecast = provider.forecast("sku-1", &history, 5).unwrap();

    assert!(forecast.low_confidence);
    let first = forecast.points[0].estimate;
    for point in &forecast.points {
        assert_eq!(point.estimate, first);
    }
}

#[test]
fn growing_product_forecasts_above_recent_average() {
    let profile = DemandProfile {
        base_level: 10.0,
        weekly_amplitude: 0.1,
        daily_trend: 0.3,
        noise: 0.5,
    };
    let series = generate_demand_series(start(), 120, &profile, 21).unwrap();
    let history = SalesHistory::from_observations(series).unwrap();

    let provider = ForecastProvider::new(SeasonalSmoothing::weekly());
    let forecast = provider.forecast("sku-1", &history, 14).unwrap();

    let summary = forecast.summary(history.trailing_mean(30).unwrap());
    assert!(
        summary.growth_pct > 0.0,
        "an upward-trending product should project growth, got {:.2}%",
        summary.growth_pct
    );
}

#[test]
fn custom_policy_changes_the_minimum_history() {
    let policy = ForecastPolicy {
        seasonal_period: 7,
        min_cycles: 6,
        ..ForecastPolicy::default()
    };
    let provider = ForecastProvider::with_policy(SeasonalSmoothing::weekly(), policy);

    // 30 days is plenty for the default policy but below 6 cycles
    let forecast = provider.forecast("sku-1", &synthetic_history(30, 9), 7).unwrap();
    assert!(forecast.low_confidence);
}
