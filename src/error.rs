use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;
use thiserror::Error;

use crate::ingest;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to append reading to log: {0}")]
    Append(#[from] std::io::Error),
}

impl IntoResponse for IngestError {
    /// A failed append must not be reported as a successful insert; the
    /// client gets a server error and the cause goes to the error log.
    fn into_response(self) -> Response {
        error!("{}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, ingest::INSERT_FAILED).into_response()
    }
}
