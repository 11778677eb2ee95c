//! Wire shapes of the stroke store's REST API.
//!
//! This crate owns the JSON representation shared by the store, the gateway
//! client and the CLI. The store treats a stroke as an opaque string in
//! [`RemoteRecord::value`]; decoding that string into a stroke is the canvas
//! crate's job, so nothing here depends on the stroke layout.


use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Path of the submit endpoint.
pub const SUBMIT_PATH: &str = "/submitNewLine";

/// Path of the fetch endpoint.
pub const FETCH_PATH: &str = "/getCanvasData";

/// Path of the health check.
pub const HEALTH_PATH: &str = "/healthz";

/// `status` value of a successful envelope.
pub const STATUS_SUCCESS: &str = "success";

/// `status` value of a failed envelope.
pub const STATUS_ERROR: &str = "error";

/// Error returned when a response body cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The body is not the expected JSON shape.
    #[error("failed to decode response body: {0}")]
    Json(#[from] serde_json::Error),
    /// The envelope decoded but reports a non-success status.
    #[error("store reported {status}: {message}")]
    Rejected { status: String, message: String },
}

/// Body of `POST /submitNewLine`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    /// RFC 3339 timestamp of the stroke.
    pub ts: String,
    /// JSON-encoded stroke.
    pub value: String,
    /// Author of the stroke.
    pub user: String,
    /// Always empty; the store reserves it for soft deletion.
    #[serde(default)]
    pub deletion_date_flag: String,
}

impl SubmitRequest {
    #[must_use]
    pub fn new(ts: impl Into<String>, value: impl Into<String>, user: impl Into<String>) -> Self {
        Self { ts: ts.into(), value: value.into(), user: user.into(), deletion_date_flag: String::new() }
    }
}

/// Response of `POST /submitNewLine`. Only its presence is relied upon.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One record as returned by `GET /getCanvasData`.
///
/// Every field is optional on decode so a single odd record cannot fail the
/// whole envelope; callers skip records whose `value` is unusable.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteRecord {
    /// Store-assigned id; string or number depending on the backend.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub id: Value,
    /// JSON-encoded stroke.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Author the record was submitted under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletion_flag: Option<String>,
}

impl RemoteRecord {
    /// The encoded stroke, or `None` when `value` is absent, not a string, or blank.
    #[must_use]
    pub fn stroke_value(&self) -> Option<&str> {
        match &self.value {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.as_str()),
            _ => None,
        }
    }
}

/// Response envelope of `GET /getCanvasData`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FetchEnvelope {
    pub status: String,
    #[serde(default)]
    pub data: Vec<RemoteRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FetchEnvelope {
    #[must_use]
    pub fn success(data: Vec<RemoteRecord>) -> Self {
        Self { status: STATUS_SUCCESS.to_owned(), data, message: None }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self { status: STATUS_ERROR.to_owned(), data: Vec::new(), message: Some(message.into()) }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    /// The records, if the envelope reports success.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Rejected`] for any status other than `"success"`.
    pub fn into_records(self) -> Result<Vec<RemoteRecord>, CodecError> {
        if self.is_success() {
            return Ok(self.data);
        }
        Err(CodecError::Rejected { status: self.status, message: self.message.unwrap_or_default() })
    }
}

/// Decode a fetch response body and unwrap its records.
///
/// # Errors
///
/// Returns [`CodecError::Json`] for a malformed body and
/// [`CodecError::Rejected`] for a non-success status.
pub fn decode_fetch(body: &[u8]) -> Result<Vec<RemoteRecord>, CodecError> {
    let envelope: FetchEnvelope = serde_json::from_slice(body)?;
    envelope.into_records()
}
