//! Core types, traits, and report logic for costwatch
//!
//! This crate provides the foundational types, error handling, timezone
//! configuration, date-range resolution, and cost aggregation used by the
//! billing provider and the handler binary.

pub mod aggregation;
pub mod billing;
pub mod error;
pub mod period;
pub mod timezone;
pub mod types;

// Re-export commonly used types
pub use billing::BillingApi;
pub use error::{CostwatchError, Result, ValidationError};
pub use types::{Action, CostForecast, CostSummary, DateRange, ErrorResult, Money, Response};
