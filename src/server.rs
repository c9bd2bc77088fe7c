use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use log::info;
use std::sync::Arc;

use crate::config::Config;
use crate::error::IngestError;
use crate::ingest;
use crate::storage::ReadingLog;

/// Builds the application router; split out so tests can drive it against
/// an ephemeral listener.
pub fn router(store: Arc<dyn ReadingLog>) -> Router {
    Router::new()
        .route("/", post(ingest_reading))
        .route("/healthz", get(healthz))
        .with_state(store)
}

pub async fn run(config: &Config, store: Arc<dyn ReadingLog>) -> Result<()> {
    let app = router(store);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind listen address: {}", config.listen_addr))?;

    info!("Listening on {}", config.listen_addr);

    axum::serve(listener, app)
        .await
        .context("HTTP server error")?;

    Ok(())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn ingest_reading(
    State(store): State<Arc<dyn ReadingLog>>,
    body: Bytes,
) -> Result<&'static str, IngestError> {
    let outcome = ingest::process(&body, store.as_ref())?;
    Ok(outcome.message())
}
