//! mashup-web: serve the mashup form over HTTP

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use mashup_core::codec::Ffmpeg;
use mashup_core::fetcher::YtDlp;
use mashup_core::Config;
use mashup_web::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting mashup-web v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load(None)?;

    let output_dir = config.output_dir();
    tokio::fs::create_dir_all(&output_dir).await?;
    info!("Output directory: {}", output_dir.display());

    let source = YtDlp::from_config(&config)?;
    let codec = Ffmpeg::from_config(&config)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, Arc::new(source), Arc::new(codec));
    if !state.notifier.is_configured() {
        warn!("SENDER_EMAIL/SENDER_PASSWORD not set; mashups will not be emailed");
    }
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("mashup-web listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
