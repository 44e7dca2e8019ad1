//! Property-based tests for costwatch using proptest

mod common;

use chrono::{Days, NaiveDate, TimeZone, Utc};
use common::{StubBilling, handler_with};
use costwatch::{
    aggregation::summarize_forecast,
    billing::ForecastBucket,
    period::{CostPeriod, ForecastPeriod},
    types::Money,
};
use proptest::prelude::*;
use serde_json::json;

// Strategies for generating test data

prop_compose! {
    fn arb_date()(offset in 0u64..36_500) -> NaiveDate {
        NaiveDate::from_ymd_opt(2000, 1, 1).unwrap() + Days::new(offset)
    }
}

prop_compose! {
    fn arb_cost_period()(
        period in prop::sample::select(vec![
            CostPeriod::Mtd,
            CostPeriod::Ytd,
            CostPeriod::Yesterday,
            CostPeriod::Today,
            CostPeriod::LastMonth,
        ])
    ) -> CostPeriod {
        period
    }
}

prop_compose! {
    fn arb_forecast_period()(
        period in prop::sample::select(vec![
            ForecastPeriod::Tomorrow,
            ForecastPeriod::Year,
            ForecastPeriod::Month,
        ])
    ) -> ForecastPeriod {
        period
    }
}

prop_compose! {
    // Ordered interval around a mean
    fn arb_forecast_bucket()(
        mean in 0.0f64..10_000.0,
        below in 0.0f64..1_000.0,
        above in 0.0f64..1_000.0,
    ) -> ForecastBucket {
        ForecastBucket {
            mean_value: Some(mean.to_string()),
            lower_bound: Some((mean - below).to_string()),
            upper_bound: Some((mean + above).to_string()),
        }
    }
}

proptest! {
    #[test]
    fn prop_normalized_never_exceeds_input(amount in -1_000_000.0f64..1_000_000.0) {
        let normalized = Money::normalized(amount).value();
        prop_assert!(normalized <= amount + 1e-9);
        prop_assert!(amount - normalized < 0.01 + 1e-9);
    }

    #[test]
    fn prop_normalized_is_monotonic(a in -10_000.0f64..10_000.0, b in -10_000.0f64..10_000.0) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(Money::normalized(low) <= Money::normalized(high));
    }

    #[test]
    fn prop_cost_ranges_are_ordered(today in arb_date(), period in arb_cost_period()) {
        let range = period.date_range(today).unwrap();
        prop_assert!(range.start <= range.end);
        prop_assert!(range.start <= today);
        prop_assert!(range.end <= today + Days::new(1));
    }

    #[test]
    fn prop_forecast_ranges_start_tomorrow(today in arb_date(), period in arb_forecast_period()) {
        let range = period.date_range(today).unwrap();
        prop_assert_eq!(range.start, today + Days::new(1));
        prop_assert!(range.start <= range.end);
    }

    #[test]
    fn prop_forecast_mean_within_bounds(
        buckets in prop::collection::vec(arb_forecast_bucket(), 0..12)
    ) {
        let forecast = summarize_forecast(&buckets).unwrap();
        prop_assert!(forecast.lower_bound <= forecast.mean);
        prop_assert!(forecast.mean <= forecast.upper_bound);
    }

    #[test]
    fn prop_handler_is_deterministic(
        amounts in prop::collection::vec(0u32..1_000_000, 0..6),
        hour in 0u32..24,
    ) {
        let amounts: Vec<String> = amounts
            .iter()
            .map(|c| format!("{}.{:03}", c / 1000, c % 1000))
            .collect();
        let refs: Vec<&str> = amounts.iter().map(String::as_str).collect();
        let (handler, _stub) = handler_with(StubBilling::new().with_costs(&refs));

        let event = json!({ "action": "cost", "period": "mtd" });
        let now = Utc.with_ymd_and_hms(2024, 7, 4, hour, 0, 0).unwrap();

        let first = tokio_test::block_on(handler.handle_at(&event, now));
        let second = tokio_test::block_on(handler.handle_at(&event, now));
        prop_assert_eq!(first, second);
    }
}
