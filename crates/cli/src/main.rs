mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use punch_client::config::ClientConfig;
use punch_client::PunchApi;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = ClientConfig::from_env();
    if let Some(api_url) = cli.api_url.clone() {
        config = ClientConfig {
            api_url: api_url.trim_end_matches('/').to_string(),
            ..config
        };
    }
    tracing::debug!(api_url = %config.api_url, token_file = %config.token_file.display(), "Loaded client configuration");

    let api = PunchApi::from_config(&config)?;
    commands::run(&api, cli.command).await
}
