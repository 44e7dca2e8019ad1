//! costwatch - Report AWS Cost Explorer spend and forecasts as compact JSON
//!
//! This library provides functionality to:
//! - Resolve period keywords (`mtd`, `lastmonth`, `year`, ...) into date ranges
//! - Query current spend and cost forecasts through a pluggable billing client
//! - Truncate and aggregate the returned amounts into a small JSON summary
//! - Report validation and upstream failures as plain response values
//!
//! # Examples
//!
//! ```no_run
//! use costwatch::{
//!     aws::{AwsConfig, CostExplorerBilling},
//!     handler::ReportHandler,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> costwatch::Result<()> {
//!     let config = AwsConfig::from_env()?;
//!     let billing = CostExplorerBilling::new(&config).await;
//!     let handler = ReportHandler::new(Arc::new(billing));
//!
//!     let event = serde_json::json!({ "action": "cost", "period": "mtd" });
//!     let response = handler.handle(&event).await;
//!     println!("{}", serde_json::to_string(&response)?);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod handler;
pub mod server;

pub use costwatch_aws as aws;
pub use costwatch_core::{aggregation, billing, error, period, timezone, types};

// Re-export commonly used types
pub use error::{CostwatchError, Result};
pub use handler::ReportHandler;
pub use types::{Action, CostForecast, CostSummary, ErrorResult, Invocation, Money, Response};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
