//! Billing API capability
//!
//! This module defines the `BillingApi` trait the handler talks to. The AWS
//! crate provides the Cost Explorer implementation; tests provide stubs.
//! Buckets carry the raw decimal strings the API returned so that parsing
//! failures surface in the aggregation step.

use crate::error::Result;
use crate::types::DateRange;
use async_trait::async_trait;
use std::fmt;

/// Prediction interval requested for forecasts, in percent
pub const PREDICTION_INTERVAL_LEVEL: i32 = 80;

/// Time-bucket size for billing queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
    #[default]
    Monthly,
}

/// Cost metric to query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CostMetric {
    /// Average of discounted and on-demand rates across the account
    #[default]
    BlendedCost,
}

impl fmt::Display for CostMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostMetric::BlendedCost => write!(f, "BlendedCost"),
        }
    }
}

/// Parameters of a cost-and-usage query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostQuery {
    pub time_period: DateRange,
    pub granularity: Granularity,
    pub metric: CostMetric,
}

impl CostQuery {
    /// Monthly blended cost over `time_period`
    pub fn monthly_blended(time_period: DateRange) -> Self {
        Self {
            time_period,
            granularity: Granularity::Monthly,
            metric: CostMetric::BlendedCost,
        }
    }
}

/// Parameters of a forecast query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastQuery {
    pub time_period: DateRange,
    pub granularity: Granularity,
    pub metric: CostMetric,
    pub prediction_interval_level: i32,
}

impl ForecastQuery {
    /// Monthly blended cost forecast with an 80% prediction interval
    pub fn monthly_blended(time_period: DateRange) -> Self {
        Self {
            time_period,
            granularity: Granularity::Monthly,
            metric: CostMetric::BlendedCost,
            prediction_interval_level: PREDICTION_INTERVAL_LEVEL,
        }
    }
}

/// One time bucket of incurred cost
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CostBucket {
    /// Decimal amount of the requested metric, if the API returned one
    pub amount: Option<String>,
}

impl CostBucket {
    pub fn new(amount: impl Into<String>) -> Self {
        Self {
            amount: Some(amount.into()),
        }
    }
}

/// One time bucket of forecast cost
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ForecastBucket {
    pub mean_value: Option<String>,
    pub lower_bound: Option<String>,
    pub upper_bound: Option<String>,
}

impl ForecastBucket {
    pub fn new(
        mean_value: impl Into<String>,
        lower_bound: impl Into<String>,
        upper_bound: impl Into<String>,
    ) -> Self {
        Self {
            mean_value: Some(mean_value.into()),
            lower_bound: Some(lower_bound.into()),
            upper_bound: Some(upper_bound.into()),
        }
    }
}

/// The two billing operations the handler needs.
///
/// Implementations hold no per-request state and may be shared across
/// invocations.
#[async_trait]
pub trait BillingApi: Send + Sync {
    /// Incurred cost per time bucket
    async fn get_cost_and_usage(&self, query: &CostQuery) -> Result<Vec<CostBucket>>;

    /// Forecast cost per time bucket
    async fn get_cost_forecast(&self, query: &ForecastQuery) -> Result<Vec<ForecastBucket>>;
}
