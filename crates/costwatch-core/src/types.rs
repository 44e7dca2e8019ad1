//! Core domain types for costwatch
//!
//! Every value here lives for a single invocation: the parsed request, the
//! resolved date range, and the response shapes sent back to the caller.

use crate::error::{CostwatchError, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Date format used on the wire and by the billing API
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Monetary amount in USD
///
/// Values coming from the billing API are truncated at the cent boundary with
/// floor semantics before they are used, see [`Money::normalized`].
///
/// # Examples
/// ```
/// use costwatch_core::types::Money;
///
/// assert_eq!(Money::normalized(2.567).value(), 2.56);
/// assert_eq!(Money::normalized(-0.001).value(), -0.01);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(f64);

impl Money {
    /// Zero dollars
    pub const ZERO: Money = Money(0.0);

    /// Wrap a raw amount without truncating it
    pub fn new(amount: f64) -> Self {
        Self(amount)
    }

    /// Truncate an amount to cents: `floor(amount * 100) / 100`
    pub fn normalized(amount: f64) -> Self {
        Self((amount * 100.0).floor() / 100.0)
    }

    /// Re-apply cent truncation to this amount
    pub fn normalize(self) -> Self {
        Self::normalized(self.0)
    }

    /// Parse a decimal string as returned by the billing API, then truncate it
    pub fn parse_normalized(raw: &str) -> Result<Self, CostwatchError> {
        let amount: f64 = raw.trim().parse().map_err(|_| {
            CostwatchError::MalformedResponse(format!("'{raw}' is not a numeric amount"))
        })?;
        Ok(Self::normalized(amount))
    }

    /// Get the inner value
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

/// Currency unit reported alongside every figure
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurrencyUnit {
    #[default]
    #[serde(rename = "USD")]
    Usd,
}

/// Inclusive start, exclusive end calendar range sent to the billing API
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DateRange {
    /// First day of the range
    pub start: NaiveDate,
    /// Day after the last day of the range
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a new DateRange
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Start date as `YYYY-MM-DD`
    pub fn start_str(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    /// End date as `YYYY-MM-DD`
    pub fn end_str(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start_str(), self.end_str())
    }
}

/// Report requested by an invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Spend already incurred
    Cost,
    /// Predicted spend
    Forecast,
}

impl Action {
    /// Match an action name case-insensitively
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "cost" => Some(Action::Cost),
            "forecast" => Some(Action::Forecast),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Cost => write!(f, "cost"),
            Action::Forecast => write!(f, "forecast"),
        }
    }
}

/// Invocation payload as received from the trigger
///
/// Fields are kept as raw JSON so validation can tell an absent field apart
/// from one holding the wrong type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Invocation {
    action: Option<Value>,
    period: Option<Value>,
}

impl Invocation {
    /// Read `action` and `period` from an event object.
    ///
    /// Anything that is not an object carries neither field.
    pub fn from_event(event: &Value) -> Self {
        Self {
            action: event.get("action").cloned(),
            period: event.get("period").cloned(),
        }
    }

    /// Validated action
    pub fn action(&self) -> Result<Action, ValidationError> {
        match &self.action {
            None => Err(ValidationError::MissingAction),
            Some(value) if is_falsy(value) => Err(ValidationError::MissingAction),
            Some(Value::String(name)) => {
                Action::parse(name).ok_or(ValidationError::InvalidAction)
            }
            Some(_) => Err(ValidationError::InvalidAction),
        }
    }

    /// Validated period keyword; empty when absent
    pub fn period(&self) -> Result<&str, ValidationError> {
        match &self.period {
            None => Ok(""),
            Some(Value::String(period)) => Ok(period),
            Some(_) => Err(ValidationError::InvalidPeriod),
        }
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_none_or(|f| f == 0.0 || f.is_nan()),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Result of the `cost` action
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostSummary {
    /// Sum of the cent-truncated bucket amounts
    pub total: Money,
    pub unit: CurrencyUnit,
}

/// Result of the `forecast` action
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostForecast {
    pub mean: Money,
    pub lower_bound: Money,
    pub upper_bound: Money,
    pub unit: CurrencyUnit,
}

/// Error reported as a normal response value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResult {
    pub error_code: u16,
    pub error_message: String,
}

impl ErrorResult {
    /// Status code for invalid invocations
    pub const BAD_REQUEST: u16 = 400;
    /// Status code for upstream and internal failures
    pub const UNKNOWN: u16 = 500;

    /// Create a 400 result
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            error_code: Self::BAD_REQUEST,
            error_message: message.into(),
        }
    }

    /// Create a 500 result wrapping the underlying failure message
    pub fn unknown(error: &CostwatchError) -> Self {
        Self {
            error_code: Self::UNKNOWN,
            error_message: format!("Unknown error: {error}"),
        }
    }
}

impl From<ValidationError> for ErrorResult {
    fn from(error: ValidationError) -> Self {
        Self::bad_request(error.to_string())
    }
}

/// Response payload, serialized without an envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Summary(CostSummary),
    Forecast(CostForecast),
    Error(ErrorResult),
}

impl Response {
    /// Error code, if this response reports a failure
    pub fn error_code(&self) -> Option<u16> {
        match self {
            Response::Error(e) => Some(e.error_code),
            _ => None,
        }
    }
}

impl From<CostSummary> for Response {
    fn from(summary: CostSummary) -> Self {
        Response::Summary(summary)
    }
}

impl From<CostForecast> for Response {
    fn from(forecast: CostForecast) -> Self {
        Response::Forecast(forecast)
    }
}

impl From<ErrorResult> for Response {
    fn from(error: ErrorResult) -> Self {
        Response::Error(error)
    }
}

impl From<ValidationError> for Response {
    fn from(error: ValidationError) -> Self {
        Response::Error(error.into())
    }
}
