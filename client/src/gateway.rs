//! Persistence gateway: the two one-shot calls to the stroke store.
//!
//! DESIGN
//! ======
//! `submit` POSTs a single stroke; `fetch_from` GETs every record past an
//! offset. Neither call retries, batches or deduplicates. Failures come back
//! as [`GatewayError`] and the session decides what to log.
//!
//! A fetch is tolerant per record: a record whose `value` is missing, blank
//! or not a stroke is counted as skipped and the rest of the batch still
//! decodes. Only a transport failure, a non-2xx status, an undecodable
//! envelope or a non-`"success"` status fails the whole call.

use std::time::Duration;

use async_trait::async_trait;
use canvas::doc::{Stroke, StrokeBatch};
use records::{FETCH_PATH, HEALTH_PATH, RemoteRecord, SUBMIT_PATH, SubmitRequest};
use tracing::{debug, warn};

use crate::config::ClientConfig;

/// Errors produced by gateway calls.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The request could not be sent or the response could not be read.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success HTTP status.
    #[error("store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not a usable envelope.
    #[error(transparent)]
    Codec(#[from] records::CodecError),

    /// The stroke could not be encoded.
    #[error("failed to encode stroke: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The store seam. Implemented over HTTP by [`HttpGateway`] and by fakes in tests.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Persist one stroke under `author`.
    async fn submit(&self, stroke: &Stroke, author: &str) -> Result<(), GatewayError>;

    /// Fetch every record at or past `offset` and decode the usable ones.
    async fn fetch_from(&self, offset: usize) -> Result<StrokeBatch, GatewayError>;
}

/// Build the submit payload for `stroke`.
///
/// # Errors
///
/// Returns the serializer error if the stroke cannot be encoded.
pub fn submit_request(stroke: &Stroke, author: &str) -> Result<SubmitRequest, serde_json::Error> {
    Ok(SubmitRequest::new(stroke.timestamp.clone(), stroke.to_value()?, author))
}

/// Decode fetched records into strokes, skipping unusable ones.
///
/// The record's `user` is the stroke's author; a stroke that carries its own
/// author keeps it only when the record has none.
#[must_use]
pub fn decode_batch(records: Vec<RemoteRecord>) -> StrokeBatch {
    let consumed = records.len();
    let mut strokes = Vec::with_capacity(consumed);
    let mut skipped = 0;

    for record in records {
        let Some(decoded) = record.stroke_value().map(Stroke::from_value) else {
            debug!(id = %record.id, "skipping record without value");
            skipped += 1;
            continue;
        };
        match decoded {
            Ok(mut stroke) => {
                if let Some(user) = record.user.filter(|u| !u.is_empty()) {
                    stroke.author = Some(user);
                }
                strokes.push(stroke);
            }
            Err(e) => {
                warn!(id = %record.id, error = %e, "skipping record with malformed stroke");
                skipped += 1;
            }
        }
    }

    StrokeBatch { strokes, consumed, skipped }
}

/// Gateway over the store's JSON REST API.
pub struct HttpGateway {
    http: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    /// # Errors
    ///
    /// Returns [`GatewayError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()?;
        Ok(Self { http, base_url: config.base_url.clone() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /healthz` with the configured timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Http`] if the store is unreachable and
    /// [`GatewayError::Status`] if it answers with a non-2xx status.
    pub async fn health(&self) -> Result<(), GatewayError> {
        let url = format!("{}{HEALTH_PATH}", self.base_url);
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status { status: status.as_u16(), body });
        }
        Ok(())
    }

    /// Fetch raw records past `offset` without decoding their strokes.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] for transport, status or envelope failures.
    pub async fn fetch_records(&self, offset: usize) -> Result<Vec<RemoteRecord>, GatewayError> {
        let url = format!("{}{FETCH_PATH}", self.base_url);
        let response = self.http.get(url).query(&[("from", offset)]).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }
        Ok(records::decode_fetch(&body)?)
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn submit(&self, stroke: &Stroke, author: &str) -> Result<(), GatewayError> {
        let payload = submit_request(stroke, author)?;
        let url = format!("{}{SUBMIT_PATH}", self.base_url);
        let response = self.http.post(url).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status { status: status.as_u16(), body });
        }
        let result = response.json::<serde_json::Value>().await?;
        debug!(stroke_id = %stroke.id, %result, "stroke stored");
        Ok(())
    }

    async fn fetch_from(&self, offset: usize) -> Result<StrokeBatch, GatewayError> {
        let records = self.fetch_records(offset).await?;
        Ok(decode_batch(records))
    }
}

#[cfg(test)]
#[path = "gateway_test.rs"]
mod tests;
