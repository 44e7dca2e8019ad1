//! Line-delimited JSON transport
//!
//! Reads one JSON event per line and writes one JSON response per line. This
//! lets the handler sit behind any trigger that can pipe text, and is what
//! the `invoke` and `serve` subcommands use.
//!
//! ```bash
//! echo '{"action":"cost","period":"mtd"}' | costwatch serve
//! ```

use crate::error::Result;
use crate::handler::ReportHandler;
use crate::types::{ErrorResult, Response};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

/// Serves invocations read from a byte stream
pub struct EventServer {
    handler: ReportHandler,
    fixed_now: Option<DateTime<Utc>>,
}

impl EventServer {
    /// Create a new server around a handler
    pub fn new(handler: ReportHandler) -> Self {
        Self {
            handler,
            fixed_now: None,
        }
    }

    /// Resolve every event as if invoked at `now`
    pub fn with_fixed_now(mut self, now: Option<DateTime<Utc>>) -> Self {
        self.fixed_now = now;
        self
    }

    /// Handle a single raw event
    ///
    /// Text that is not JSON is answered with a 400 result.
    pub async fn handle_line(&self, line: &str) -> Response {
        match serde_json::from_str::<Value>(line) {
            Ok(event) => {
                let now = self.fixed_now.unwrap_or_else(Utc::now);
                self.handler.handle_at(&event, now).await
            }
            Err(e) => {
                error!("Failed to parse event: {}", e);
                ErrorResult::bad_request(format!("Invalid event: {e}")).into()
            }
        }
    }

    /// Handle a raw event that may not be valid UTF-8
    pub async fn handle_bytes(&self, bytes: &[u8]) -> Response {
        match std::str::from_utf8(bytes) {
            Ok(line) => self.handle_line(line.trim()).await,
            Err(e) => {
                error!("Event is not valid UTF-8: {}", e);
                ErrorResult::bad_request(format!("Invalid event: {e}")).into()
            }
        }
    }

    /// Process events from `reader` until it is exhausted
    pub async fn run<R, W>(&self, reader: R, writer: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        // Split on raw bytes so one undecodable line cannot end the stream
        let mut lines = reader.split(b'\n');

        while let Some(line) = lines.next_segment().await? {
            if line.trim_ascii().is_empty() {
                continue;
            }

            debug!("Received event: {}", String::from_utf8_lossy(&line));
            let response = self.handle_bytes(&line).await;
            if let Some(code) = response.error_code() {
                debug!("Event rejected with code {}", code);
            }
            let response_str = serde_json::to_string(&response)?;

            writer.write_all(response_str.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;

            debug!("Sent response: {}", response_str);
        }

        Ok(())
    }

    /// Process events from stdin, answering on stdout
    pub async fn run_stdio(&self) -> Result<()> {
        info!("Listening for events on stdin");

        let reader = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        self.run(reader, &mut stdout).await?;

        info!("Input closed, shutting down");
        Ok(())
    }
}
