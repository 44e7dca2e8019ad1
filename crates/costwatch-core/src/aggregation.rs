//! Aggregation of billing buckets into report figures
//!
//! Every bucket amount is truncated to cents before it is summed. The cost
//! summary returns that sum as is; the forecast truncates each of its three
//! sums once more. Callers rely on both behaviours, so they are kept distinct.
//!
//! # Examples
//!
//! ```
//! use costwatch_core::aggregation::summarize_costs;
//! use costwatch_core::billing::CostBucket;
//!
//! let buckets = vec![CostBucket::new("10.129"), CostBucket::new("5.555")];
//! let summary = summarize_costs(&buckets).unwrap();
//! assert_eq!(summary.total.value(), 10.12 + 5.55);
//! ```

use crate::billing::{CostBucket, ForecastBucket};
use crate::error::{CostwatchError, Result};
use crate::types::{CostForecast, CostSummary, CurrencyUnit, Money};
use tracing::debug;

/// Running totals of forecast buckets
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct ForecastTotals {
    mean: Money,
    lower_bound: Money,
    upper_bound: Money,
}

/// Sum cent-truncated bucket amounts into a cost summary
pub fn summarize_costs(buckets: &[CostBucket]) -> Result<CostSummary> {
    let mut total = Money::ZERO;

    for (index, bucket) in buckets.iter().enumerate() {
        let amount = parse_field(bucket.amount.as_deref(), index, "BlendedCost.Amount")?;
        total += amount;
    }

    debug!("Summed {} cost buckets: {}", buckets.len(), total);

    Ok(CostSummary {
        total,
        unit: CurrencyUnit::Usd,
    })
}

/// Sum cent-truncated forecast buckets, then truncate each total again
pub fn summarize_forecast(buckets: &[ForecastBucket]) -> Result<CostForecast> {
    let mut totals = ForecastTotals::default();

    for (index, bucket) in buckets.iter().enumerate() {
        totals.mean += parse_field(bucket.mean_value.as_deref(), index, "MeanValue")?;
        totals.lower_bound += parse_field(
            bucket.lower_bound.as_deref(),
            index,
            "PredictionIntervalLowerBound",
        )?;
        totals.upper_bound += parse_field(
            bucket.upper_bound.as_deref(),
            index,
            "PredictionIntervalUpperBound",
        )?;
    }

    debug!(
        "Summed {} forecast buckets: mean {}, interval [{}, {}]",
        buckets.len(),
        totals.mean,
        totals.lower_bound,
        totals.upper_bound
    );

    Ok(CostForecast {
        mean: totals.mean.normalize(),
        lower_bound: totals.lower_bound.normalize(),
        upper_bound: totals.upper_bound.normalize(),
        unit: CurrencyUnit::Usd,
    })
}

fn parse_field(raw: Option<&str>, index: usize, field: &str) -> Result<Money> {
    let raw = raw.ok_or_else(|| {
        CostwatchError::MalformedResponse(format!("bucket {index} is missing {field}"))
    })?;
    Money::parse_normalized(raw)
}
