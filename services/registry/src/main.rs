use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod cli;
mod error;
mod pages;
mod prompt;
mod render;
mod routes;
mod user_service;

#[cfg(test)]
mod test_support;

use common::config::ApiConfig;

use crate::{cli::Cli, user_service::UserService};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for page output
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let cli = Cli::parse();

    let mut config = ApiConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.as_str())?;
    }
    let service = UserService::new(&config)?;
    info!("Using registry API at {}", service.base_url());

    cli::run(cli.command, &service, &config).await
}
