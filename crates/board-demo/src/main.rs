//! Board demo
//!
//! Drives a few boards through their paces and writes every view to an SVG
//! file: a knight's tour, one view per transform, fool's mate and n-queens.

mod config;
mod demos;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::DemoConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = DemoConfig::from_env();
    std::fs::create_dir_all(&config.out_dir)?;
    info!(out_dir = %config.out_dir.display(), "writing demo boards");

    demos::knights_tour(&config).await?;
    demos::transform_gallery(&config).await?;
    demos::fools_mate(&config).await?;
    demos::n_queens(&config).await?;

    info!("done");
    Ok(())
}
