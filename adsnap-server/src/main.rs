//! AdSnap Server - Headless Daemon
//!
//! Proxies product-photography edits to the image-editing provider:
//! - `/api/*` operations (lifestyle, background removal, HD, video, CTA)
//! - `/assets/templates/*` reference scenes
//! - `/health`, `/healthz`

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;
mod router;

use adsnap_core::proxy::AppState;
use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; the environment may already be populated.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    let config = cli.service_config();
    info!(
        "AdSnap starting: provider={}, vision={}, templates={}",
        config.bria_base_url,
        if config.vision_key().is_some() { "enabled" } else { "disabled" },
        config.templates_path().display()
    );

    let state = AppState::from_config(config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize state: {}", e))?;
    let app = router::build_router(state);

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);
    info!("API available at http://{}/api/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
