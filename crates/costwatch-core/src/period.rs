//! Period keywords and their date ranges
//!
//! Each report accepts a small set of period keywords, matched
//! case-insensitively. Unknown keywords (including the empty string) fall back
//! to the report's default period instead of failing.
//!
//! All ranges are computed from an explicit `today`, the invocation instant
//! already converted to a calendar date.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use costwatch_core::period::CostPeriod;
//!
//! let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
//! let range = CostPeriod::parse("mtd").date_range(today).unwrap();
//! assert_eq!(range.start_str(), "2024-03-01");
//! assert_eq!(range.end_str(), "2024-03-16");
//! ```

use crate::error::{CostwatchError, Result};
use crate::types::{Action, DateRange};
use chrono::{Datelike, Days, Months, NaiveDate};
use std::fmt;

/// Period for the `cost` report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CostPeriod {
    /// Month to date
    Mtd,
    /// Year to date
    Ytd,
    Yesterday,
    Today,
    /// The whole previous calendar month
    #[default]
    LastMonth,
}

impl CostPeriod {
    /// Match a period keyword, falling back to [`CostPeriod::LastMonth`]
    pub fn parse(keyword: &str) -> Self {
        match keyword.to_uppercase().as_str() {
            "MTD" => CostPeriod::Mtd,
            "YTD" => CostPeriod::Ytd,
            "YESTERDAY" => CostPeriod::Yesterday,
            "TODAY" => CostPeriod::Today,
            _ => CostPeriod::LastMonth,
        }
    }

    /// Resolve the range relative to `today`
    pub fn date_range(self, today: NaiveDate) -> Result<DateRange> {
        let range = match self {
            CostPeriod::Mtd => DateRange::new(start_of_month(today)?, add_days(today, 1)?),
            CostPeriod::Ytd => DateRange::new(start_of_year(today)?, add_days(today, 1)?),
            CostPeriod::Yesterday => DateRange::new(sub_days(today, 1)?, today),
            CostPeriod::Today => DateRange::new(today, add_days(today, 1)?),
            CostPeriod::LastMonth => {
                let this_month = start_of_month(today)?;
                DateRange::new(sub_months(this_month, 1)?, this_month)
            }
        };
        Ok(range)
    }
}

impl fmt::Display for CostPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CostPeriod::Mtd => "MTD",
            CostPeriod::Ytd => "YTD",
            CostPeriod::Yesterday => "YESTERDAY",
            CostPeriod::Today => "TODAY",
            CostPeriod::LastMonth => "LASTMONTH",
        };
        f.write_str(name)
    }
}

/// Period for the `forecast` report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForecastPeriod {
    Tomorrow,
    /// From tomorrow until the same day next year
    Year,
    /// From tomorrow until the same day next month
    #[default]
    Month,
}

impl ForecastPeriod {
    /// Match a period keyword, falling back to [`ForecastPeriod::Month`]
    pub fn parse(keyword: &str) -> Self {
        match keyword.to_uppercase().as_str() {
            "TOMORROW" => ForecastPeriod::Tomorrow,
            "YEAR" => ForecastPeriod::Year,
            _ => ForecastPeriod::Month,
        }
    }

    /// Resolve the range relative to `today`
    pub fn date_range(self, today: NaiveDate) -> Result<DateRange> {
        let start = add_days(today, 1)?;
        let end = match self {
            ForecastPeriod::Tomorrow => add_days(today, 2)?,
            ForecastPeriod::Year => add_months(today, 12)?,
            ForecastPeriod::Month => add_months(today, 1)?,
        };
        Ok(DateRange::new(start, end))
    }
}

impl fmt::Display for ForecastPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ForecastPeriod::Tomorrow => "TOMORROW",
            ForecastPeriod::Year => "YEAR",
            ForecastPeriod::Month => "MONTH",
        };
        f.write_str(name)
    }
}

/// Resolve the range for an action and raw period keyword
pub fn resolve_range(action: Action, keyword: &str, today: NaiveDate) -> Result<DateRange> {
    match action {
        Action::Cost => CostPeriod::parse(keyword).date_range(today),
        Action::Forecast => ForecastPeriod::parse(keyword).date_range(today),
    }
}

fn out_of_range(date: NaiveDate, what: &str) -> CostwatchError {
    CostwatchError::InvalidDate(format!("{what} is out of range for {date}"))
}

fn start_of_month(date: NaiveDate) -> Result<NaiveDate> {
    date.with_day(1)
        .ok_or_else(|| out_of_range(date, "start of month"))
}

fn start_of_year(date: NaiveDate) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).ok_or_else(|| out_of_range(date, "start of year"))
}

fn add_days(date: NaiveDate, days: u64) -> Result<NaiveDate> {
    date.checked_add_days(Days::new(days))
        .ok_or_else(|| out_of_range(date, "day offset"))
}

fn sub_days(date: NaiveDate, days: u64) -> Result<NaiveDate> {
    date.checked_sub_days(Days::new(days))
        .ok_or_else(|| out_of_range(date, "day offset"))
}

// Month arithmetic clamps to the last day of a shorter target month.
fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| out_of_range(date, "month offset"))
}

fn sub_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_sub_months(Months::new(months))
        .ok_or_else(|| out_of_range(date, "month offset"))
}
