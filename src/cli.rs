//! CLI interface for costwatch
//!
//! # Example
//!
//! ```bash
//! # One invocation, event given inline
//! costwatch invoke '{"action":"cost","period":"mtd"}'
//!
//! # Line-delimited events on stdin
//! costwatch serve < events.jsonl
//!
//! # Show the date range a request would use, without calling AWS
//! costwatch range forecast year
//! ```

use crate::aws::config::DEFAULT_REGION;
use crate::error::{CostwatchError, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

/// Report AWS Cost Explorer spend and forecasts as JSON
#[derive(Parser, Debug, Clone)]
#[command(name = "costwatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Only log warnings and errors (overrides RUST_LOG)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Timezone used to decide what "today" is
    #[command(flatten)]
    pub timezone_args: TimezoneArgs,

    /// Pin the invocation instant (RFC 3339), e.g. 2024-03-15T12:00:00Z
    #[arg(long, global = true, value_parser = parse_instant)]
    pub now: Option<DateTime<Utc>>,

    #[command(flatten)]
    pub credentials: CredentialArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Timezone selection shared by all subcommands
#[derive(Args, Debug, Clone, Default)]
pub struct TimezoneArgs {
    /// Timezone for period resolution (e.g. "America/New_York", "UTC").
    /// If not specified, uses TZ or the system's local timezone
    #[arg(long, short = 'z', global = true)]
    pub timezone: Option<String>,

    /// Use UTC for period resolution (overrides --timezone)
    #[arg(long, global = true)]
    pub utc: bool,
}

/// Billing API credentials
#[derive(Args, Debug, Clone, Default)]
pub struct CredentialArgs {
    /// Access key id for Cost Explorer
    #[arg(long, env = "ACCESS_KEY_ID", hide_env_values = true, global = true)]
    pub access_key_id: Option<String>,

    /// Secret access key for Cost Explorer
    #[arg(long, env = "SECRET_ACCESS_KEY", hide_env_values = true, global = true)]
    pub secret_access_key: Option<String>,

    /// Session token for temporary credentials
    #[arg(long, env = "SESSION_TOKEN", hide_env_values = true, global = true)]
    pub session_token: Option<String>,

    /// Cost Explorer region
    #[arg(long, default_value = DEFAULT_REGION, global = true)]
    pub region: String,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Handle a single event and print the response
    Invoke {
        /// Event JSON; read from stdin when omitted
        event: Option<String>,
    },

    /// Handle line-delimited events from stdin until it closes
    Serve,

    /// Print the date range a request would query
    Range {
        /// Report to resolve for (cost or forecast)
        action: String,

        /// Period keyword; defaults to the report's default period
        #[arg(default_value = "")]
        period: String,
    },
}

/// Parse an RFC 3339 instant
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CostwatchError::InvalidDate(format!("'{s}': {e}")))
}
