//! mashup-web: HTML form front end that runs one mashup job per submission
//! and serves the results.

use axum::routing::{get, post};
use axum::Router;
use mashup_core::codec::AudioCodec;
use mashup_core::fetcher::MediaSource;
use mashup_core::notifier::Notifier;
use mashup_core::Config;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod handlers;
pub mod job;
pub mod views;

/// Application state shared across HTTP handlers. Everything in here is
/// immutable; jobs only share the output directory on disk.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub source: Arc<dyn MediaSource>,
    pub codec: Arc<dyn AudioCodec>,
    pub notifier: Notifier,
}

impl AppState {
    pub fn new(
        config: Config,
        source: Arc<dyn MediaSource>,
        codec: Arc<dyn AudioCodec>,
    ) -> Self {
        let notifier = Notifier::new(config.smtp.clone());
        Self {
            config: Arc::new(config),
            source,
            codec,
            notifier,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/mashup", post(handlers::mashup))
        .route("/health", get(handlers::health))
        .route("/output/:filename", get(handlers::output))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
