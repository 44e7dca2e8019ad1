//! costwatch - Report AWS Cost Explorer spend and forecasts as compact JSON

use chrono::Utc;
use clap::Parser;
use costwatch::{
    aws::{AwsConfig, CostExplorerBilling},
    cli::{Cli, Command, CredentialArgs, TimezoneArgs},
    error::Result,
    handler::ReportHandler,
    period::resolve_range,
    server::EventServer,
    timezone::TimezoneConfig,
    types::{Action, ErrorResult, Response},
};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn timezone_config(args: &TimezoneArgs) -> Result<TimezoneConfig> {
    let tz_config = TimezoneConfig::from_cli(args.timezone.as_deref(), args.utc)?;
    info!("Using timezone: {}", tz_config.display_name());
    Ok(tz_config)
}

async fn build_handler(
    credentials: &CredentialArgs,
    timezone: TimezoneConfig,
) -> Result<ReportHandler> {
    let config = AwsConfig::from_credentials(
        credentials.access_key_id.clone(),
        credentials.secret_access_key.clone(),
        credentials.session_token.clone(),
    )?
    .with_region(credentials.region.clone());

    let billing = CostExplorerBilling::new(&config).await;
    Ok(ReportHandler::new(Arc::new(billing)).with_timezone(timezone))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // --quiet overrides RUST_LOG; stdout is reserved for responses
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("warn")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("costwatch=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let timezone = timezone_config(&cli.timezone_args)?;

    match cli.command {
        Command::Invoke { event } => {
            let event = match event {
                Some(event) => event.into_bytes(),
                None => {
                    let mut buf = Vec::new();
                    tokio::io::stdin().read_to_end(&mut buf).await?;
                    buf
                }
            };

            let handler = build_handler(&cli.credentials, timezone).await?;
            let server = EventServer::new(handler).with_fixed_now(cli.now);
            let response = server.handle_bytes(&event).await;
            println!("{}", serde_json::to_string(&response)?);
        }

        Command::Serve => {
            let handler = build_handler(&cli.credentials, timezone).await?;
            EventServer::new(handler)
                .with_fixed_now(cli.now)
                .run_stdio()
                .await?;
        }

        Command::Range { action, period } => {
            let response = match Action::parse(&action) {
                Some(action) => {
                    let today = timezone.today(cli.now.unwrap_or_else(Utc::now));
                    let range = resolve_range(action, &period, today)?;
                    serde_json::to_value(range)?
                }
                None => serde_json::to_value(Response::from(ErrorResult::bad_request(
                    "Invalid action",
                )))?,
            };
            println!("{response}");
        }
    }

    Ok(())
}
