use anyhow::{Context, Result};
use clap::Parser;
use skillgap::cli::{handle_command, Cli};
use skillgap::core::ConfigManager;
use std::fs::OpenOptions;
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ConfigManager::load()?;

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true) // Clear file on startup
        .open(&config.environment.log_path)
        .with_context(|| {
            format!(
                "Failed to open log file {}",
                config.environment.log_path.display()
            )
        })?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("skillgap=info,rocket::server=off")),
        )
        .init();

    config.ensure_directories().await?;

    info!("Environment: {}", config.environment.name);
    info!("Corpus: {}", config.environment.corpus_path.display());
    info!("Job site: {}", config.scraper.site_url);
    info!("WebDriver: {}", config.scraper.webdriver_url);
    info!(
        "Analysis service: {} ({})",
        config.analysis.api_url, config.analysis.model
    );

    handle_command(cli, config).await
}
