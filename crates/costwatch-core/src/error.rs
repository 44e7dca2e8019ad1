//! Error types for costwatch
//!
//! Two error families live here. [`ValidationError`] covers problems with the
//! invocation payload itself and is always reported back to the caller as a
//! 400 result. [`CostwatchError`] covers everything else: billing API failures,
//! malformed responses, configuration and I/O problems.
//!
//! # Example
//!
//! ```
//! use costwatch_core::error::{CostwatchError, Result};
//!
//! fn parse_amount(raw: &str) -> Result<f64> {
//!     raw.trim()
//!         .parse()
//!         .map_err(|_| CostwatchError::MalformedResponse(format!("bad amount '{raw}'")))
//! }
//!
//! assert!(parse_amount("12.5").is_ok());
//! assert!(parse_amount("twelve").is_err());
//! ```

use thiserror::Error;

/// Main error type for costwatch operations
#[derive(Error, Debug)]
pub enum CostwatchError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid date format
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// Invalid timezone
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Failure reported by the billing API or the transport underneath it.
    ///
    /// Displays the bare upstream message.
    #[error("{0}")]
    Upstream(String),

    /// The billing API answered, but a bucket was missing a field or held a
    /// non-numeric amount
    #[error("Malformed billing response: {0}")]
    MalformedResponse(String),
}

/// Problems with the invocation payload, detected before any billing call
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// `action` absent, null, or otherwise falsy
    #[error("Missing action")]
    MissingAction,

    /// `action` present but not one of the supported reports
    #[error("Invalid action")]
    InvalidAction,

    /// `period` present but not a string
    #[error("Invalid period")]
    InvalidPeriod,
}

/// Convenience type alias for Results in costwatch
pub type Result<T> = std::result::Result<T, CostwatchError>;
