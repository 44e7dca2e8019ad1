//! Common test utilities and helpers for costwatch tests
//!
//! Provides a recording stub billing client, fixed invocation instants, and
//! small helpers to run events through a handler.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use costwatch::{
    billing::{BillingApi, CostBucket, CostQuery, ForecastBucket, ForecastQuery},
    error::{CostwatchError, Result},
    handler::ReportHandler,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Billing client answering from canned buckets and recording every query
#[derive(Default)]
pub struct StubBilling {
    cost_buckets: Vec<CostBucket>,
    forecast_buckets: Vec<ForecastBucket>,
    failure: Option<String>,
    cost_queries: Mutex<Vec<CostQuery>>,
    forecast_queries: Mutex<Vec<ForecastQuery>>,
}

impl StubBilling {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer cost queries with one bucket per amount
    pub fn with_costs(mut self, amounts: &[&str]) -> Self {
        self.cost_buckets = amounts.iter().map(|a| CostBucket::new(*a)).collect();
        self
    }

    /// Answer cost queries with arbitrary buckets
    pub fn with_cost_buckets(mut self, buckets: Vec<CostBucket>) -> Self {
        self.cost_buckets = buckets;
        self
    }

    /// Answer forecast queries with one bucket per (mean, lower, upper)
    pub fn with_forecasts(mut self, buckets: &[(&str, &str, &str)]) -> Self {
        self.forecast_buckets = buckets
            .iter()
            .map(|(mean, lower, upper)| ForecastBucket::new(*mean, *lower, *upper))
            .collect();
        self
    }

    /// Fail every call with the given upstream message
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn cost_queries(&self) -> Vec<CostQuery> {
        self.cost_queries.lock().unwrap().clone()
    }

    pub fn forecast_queries(&self) -> Vec<ForecastQuery> {
        self.forecast_queries.lock().unwrap().clone()
    }

    /// Total number of billing calls made
    pub fn call_count(&self) -> usize {
        self.cost_queries.lock().unwrap().len() + self.forecast_queries.lock().unwrap().len()
    }

    fn check_failure(&self) -> Result<()> {
        match &self.failure {
            Some(message) => Err(CostwatchError::Upstream(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BillingApi for StubBilling {
    async fn get_cost_and_usage(&self, query: &CostQuery) -> Result<Vec<CostBucket>> {
        self.cost_queries.lock().unwrap().push(query.clone());
        self.check_failure()?;
        Ok(self.cost_buckets.clone())
    }

    async fn get_cost_forecast(&self, query: &ForecastQuery) -> Result<Vec<ForecastBucket>> {
        self.forecast_queries.lock().unwrap().push(query.clone());
        self.check_failure()?;
        Ok(self.forecast_buckets.clone())
    }
}

/// Invocation instant used by most tests: 2024-03-15T12:00:00Z
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Wrap a stub in a UTC handler, keeping a handle for inspecting queries
pub fn handler_with(stub: StubBilling) -> (ReportHandler, Arc<StubBilling>) {
    let stub = Arc::new(stub);
    let handler = ReportHandler::new(stub.clone());
    (handler, stub)
}

/// Run one event at [`fixed_now`] and return the response as JSON
pub async fn invoke(handler: &ReportHandler, event: Value) -> Value {
    let response = handler.handle_at(&event, fixed_now()).await;
    serde_json::to_value(response).unwrap()
}
