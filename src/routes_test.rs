use axum::response::IntoResponse;
use records::{RemoteRecord, STATUS_ERROR};

use super::*;

fn request(user: &str) -> SubmitRequest {
    SubmitRequest::new("2024-01-01T00:00:00Z", "{\"drawingId\":\"s1\"}", user)
}

async fn fetch(state: &StoreState, from: Option<usize>) -> FetchEnvelope {
    let Json(envelope) = canvas_data(State(state.clone()), Ok(Query(FetchParams { from }))).await.unwrap();
    envelope
}

#[tokio::test]
async fn submit_answers_success_with_id() {
    let state = StoreState::new();
    let Json(resp) = submit_line(State(state.clone()), Ok(Json(request("alice")))).await.unwrap();
    assert_eq!(resp.status, "success");
    assert!(resp.id.is_some());
    assert_eq!(state.len().await, 1);
}

#[tokio::test]
async fn fetch_without_from_returns_everything() {
    let state = StoreState::new();
    for user in ["alice", "bob"] {
        state.append(request(user)).await;
    }
    let envelope = fetch(&state, None).await;
    assert!(envelope.is_success());
    assert_eq!(envelope.data.len(), 2);
}

#[tokio::test]
async fn fetch_from_offset_skips_earlier_records() {
    let state = StoreState::new();
    for user in ["alice", "bob", "carol"] {
        state.append(request(user)).await;
    }
    let envelope = fetch(&state, Some(2)).await;
    assert_eq!(envelope.data.len(), 1);
    assert_eq!(envelope.data[0].user.as_deref(), Some("carol"));
    assert!(fetch(&state, Some(9)).await.data.is_empty());
}

#[tokio::test]
async fn fetch_serves_raw_records_untouched() {
    let state = StoreState::new();
    state.append_raw(RemoteRecord { user: Some("ghost".to_owned()), ..RemoteRecord::default() }).await;
    let envelope = fetch(&state, None).await;
    assert_eq!(envelope.data[0].value, None);
}

#[test]
fn bad_request_maps_to_400() {
    let err = StoreError::BadRequest("missing field `value`".to_owned());
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
}

#[test]
fn io_error_maps_to_500() {
    let err = StoreError::from(std::io::Error::other("disk"));
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn failure_envelope_shape() {
    let envelope = FetchEnvelope::failure("bad request: nope");
    assert_eq!(envelope.status, STATUS_ERROR);
    assert!(envelope.data.is_empty());
}

#[tokio::test]
async fn healthz_is_ok() {
    assert_eq!(healthz().await, (StatusCode::OK, "ok"));
}
