//! Router assembly and handlers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Two endpoints mirror the ledger store the canvas talks to:
//! `POST /submitNewLine` appends one record and `GET /getCanvasData?from=N`
//! returns the log from offset `N`. CORS is wide open so a canvas served
//! from another origin can reach it.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use records::{FETCH_PATH, FetchEnvelope, HEALTH_PATH, STATUS_SUCCESS, SUBMIT_PATH, SubmitRequest, SubmitResponse};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::state::StoreState;

#[must_use]
pub fn app(state: StoreState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(SUBMIT_PATH, post(submit_line))
        .route(FETCH_PATH, get(canvas_data))
        .route(HEALTH_PATH, get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `POST /submitNewLine`
///
/// # Errors
///
/// [`StoreError::BadRequest`] when the body is not a submit payload.
pub async fn submit_line(
    State(state): State<StoreState>,
    body: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<Json<SubmitResponse>, StoreError> {
    let Json(request) = body.map_err(|e| StoreError::BadRequest(e.body_text()))?;
    let user = request.user.clone();
    let id = state.append(request).await;
    info!(%id, %user, "line stored");
    Ok(Json(SubmitResponse { status: STATUS_SUCCESS.to_owned(), id: Some(id), message: None }))
}

#[derive(Debug, Default, Deserialize)]
pub struct FetchParams {
    #[serde(default)]
    pub from: Option<usize>,
}

/// `GET /getCanvasData?from=N`
///
/// # Errors
///
/// [`StoreError::BadRequest`] when `from` is not a non-negative integer.
pub async fn canvas_data(
    State(state): State<StoreState>,
    params: Result<Query<FetchParams>, QueryRejection>,
) -> Result<Json<FetchEnvelope>, StoreError> {
    let Query(params) = params.map_err(|e| StoreError::BadRequest(e.body_text()))?;
    let offset = params.from.unwrap_or(0);
    let records = state.records_from(offset).await;
    debug!(offset, count = records.len(), "canvas data served");
    Ok(Json(FetchEnvelope::success(records)))
}

pub async fn healthz() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;
