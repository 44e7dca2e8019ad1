//! Timezone utilities for period resolution
//!
//! Period keywords such as `TODAY` or `MTD` are calendar notions, so the
//! invocation instant has to be turned into a local date first. This module
//! decides which timezone that happens in.

use crate::error::{CostwatchError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use std::str::FromStr;
use tracing::debug;

/// Timezone in which invocation dates are taken
#[derive(Debug, Clone)]
pub struct TimezoneConfig {
    pub tz: Tz,
    /// Set when `tz` is UTC, either chosen or detected
    pub is_utc: bool,
}

impl Default for TimezoneConfig {
    /// Detected host timezone
    fn default() -> Self {
        Self::from_tz(get_local_timezone())
    }
}

impl TimezoneConfig {
    /// Configuration pinned to UTC
    pub fn utc() -> Self {
        Self::from_tz(Tz::UTC)
    }

    fn from_tz(tz: Tz) -> Self {
        Self {
            is_utc: tz == Tz::UTC,
            tz,
        }
    }

    /// Resolve the `--timezone` / `--utc` pair.
    ///
    /// `--utc` wins; with neither flag the host timezone is detected.
    pub fn from_cli(timezone: Option<&str>, utc: bool) -> Result<Self> {
        match (utc, timezone) {
            (true, _) => Ok(Self::utc()),
            (false, Some(name)) => Tz::from_str(name).map(Self::from_tz).map_err(|_| {
                CostwatchError::InvalidTimezone(format!(
                    "'{name}' is not an IANA zone name (try 'Europe/Berlin' or 'UTC')"
                ))
            }),
            (false, None) => Ok(Self::default()),
        }
    }

    /// Name shown in logs
    pub fn display_name(&self) -> &str {
        if self.is_utc { "UTC" } else { self.tz.name() }
    }

    /// Calendar date of `now` in the configured timezone
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.tz).date_naive()
    }
}

/// Host timezone: `TZ` if it names a zone, then the OS setting, then UTC
pub fn get_local_timezone() -> Tz {
    zone_from_tz_var()
        .or_else(zone_from_os)
        .unwrap_or_else(|| {
            debug!("No usable host timezone, dates are taken in UTC");
            Tz::UTC
        })
}

// Lambda-style values carry a leading colon, e.g. ":UTC"
fn zone_from_tz_var() -> Option<Tz> {
    let raw = std::env::var("TZ").ok()?;
    let tz = Tz::from_str(raw.trim_start_matches(':')).ok()?;
    debug!("Timezone {} taken from TZ", tz);
    Some(tz)
}

fn zone_from_os() -> Option<Tz> {
    let name = iana_time_zone::get_timezone()
        .map_err(|e| debug!("OS timezone lookup failed: {}", e))
        .ok()?;
    let tz = Tz::from_str(&name)
        .map_err(|_| debug!("OS reported unknown zone '{}'", name))
        .ok()?;
    debug!("Timezone {} taken from the OS", tz);
    Some(tz)
}
