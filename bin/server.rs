// Key Audit - Web Server
// POST /api/analyze with {"keys": [...]} returns the pattern analysis

use anyhow::{Context, Result};
use key_audit::{api, KeyAnalyzer, ServerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();
    let thresholds = config.analyzer_config()?;
    info!(
        randomness_threshold = thresholds.randomness_threshold,
        increment_variation_threshold = thresholds.increment_variation_threshold,
        "analyzer configured"
    );

    let app = api::router(KeyAnalyzer::with_config(thresholds));

    let listener = tokio::net::TcpListener::bind(&config.addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.addr))?;

    info!("Server running on http://{}", config.addr);
    info!("API: POST http://{}/api/analyze", config.addr);

    axum::serve(listener, app)
        .await
        .context("Server terminated unexpectedly")?;

    Ok(())
}
