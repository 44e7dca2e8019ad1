//! Invocation handler
//!
//! The handler takes a raw JSON event, validates it, resolves the requested
//! period into a date range, makes exactly one billing call, and aggregates
//! the answer. Every outcome, failures included, is returned as a
//! [`Response`] value; nothing escapes as a transport-level error.
//!
//! # Event
//!
//! ```json
//! { "action": "forecast", "period": "year" }
//! ```
//!
//! # Responses
//!
//! ```json
//! { "total": 123.45, "unit": "USD" }
//! { "mean": 210.5, "lowerBound": 180.25, "upperBound": 240.75, "unit": "USD" }
//! { "errorCode": 400, "errorMessage": "Invalid action" }
//! ```

use crate::aggregation::{summarize_costs, summarize_forecast};
use crate::billing::{BillingApi, CostQuery, ForecastQuery};
use crate::error::{Result, ValidationError};
use crate::period::{CostPeriod, ForecastPeriod};
use crate::timezone::TimezoneConfig;
use crate::types::{Action, CostForecast, CostSummary, ErrorResult, Invocation, Response};
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Dispatches invocations to the cost and forecast reports
#[derive(Clone)]
pub struct ReportHandler {
    billing: Arc<dyn BillingApi>,
    timezone: TimezoneConfig,
}

impl ReportHandler {
    /// Create a handler around a billing client, using UTC dates
    pub fn new(billing: Arc<dyn BillingApi>) -> Self {
        Self {
            billing,
            timezone: TimezoneConfig::utc(),
        }
    }

    /// Use a different timezone to derive the invocation date
    pub fn with_timezone(mut self, timezone: TimezoneConfig) -> Self {
        self.timezone = timezone;
        self
    }

    /// Handle an event at the current instant
    pub async fn handle(&self, event: &Value) -> Response {
        self.handle_at(event, Utc::now()).await
    }

    /// Handle an event as if invoked at `now`
    pub async fn handle_at(&self, event: &Value, now: DateTime<Utc>) -> Response {
        let invocation = Invocation::from_event(event);

        let action = match invocation.action() {
            Ok(action) => action,
            Err(e) => return rejected(e),
        };

        info!("Handling {} request", action);

        let today = self.timezone.today(now);
        let outcome = match action {
            Action::Cost => match invocation.period() {
                Ok(period) => self
                    .cost_summary(CostPeriod::parse(period), today)
                    .await
                    .map(Response::from),
                Err(e) => return rejected(e),
            },
            Action::Forecast => match invocation.period() {
                Ok(period) => self
                    .cost_forecast(ForecastPeriod::parse(period), today)
                    .await
                    .map(Response::from),
                Err(e) => return rejected(e),
            },
        };

        match outcome {
            Ok(response) => response,
            Err(e) => {
                error!("{} request failed: {}", action, e);
                ErrorResult::unknown(&e).into()
            }
        }
    }

    /// Incurred cost for `period`, relative to `today`
    pub async fn cost_summary(&self, period: CostPeriod, today: NaiveDate) -> Result<CostSummary> {
        let range = period.date_range(today)?;
        debug!("Resolved cost period {} to {}", period, range);

        let buckets = self
            .billing
            .get_cost_and_usage(&CostQuery::monthly_blended(range))
            .await?;
        summarize_costs(&buckets)
    }

    /// Forecast cost for `period`, relative to `today`
    pub async fn cost_forecast(
        &self,
        period: ForecastPeriod,
        today: NaiveDate,
    ) -> Result<CostForecast> {
        let range = period.date_range(today)?;
        debug!("Resolved forecast period {} to {}", period, range);

        let buckets = self
            .billing
            .get_cost_forecast(&ForecastQuery::monthly_blended(range))
            .await?;
        summarize_forecast(&buckets)
    }
}

fn rejected(error: ValidationError) -> Response {
    warn!("Rejected invocation: {}", error);
    error.into()
}
