//! Store error type and its HTTP mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use records::FetchEnvelope;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid {key}: {value:?}")]
    InvalidConfig { key: &'static str, value: String },

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StoreError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidConfig { .. } | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Errors answer with the same envelope as a fetch, so clients decode one shape.
impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        (self.status(), Json(FetchEnvelope::failure(self.to_string()))).into_response()
    }
}
