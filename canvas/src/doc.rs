//! Document model: strokes, their wire encoding, and the session registry.
//!
//! A [`Stroke`] is one finished pointer drag. Strokes are serialized to JSON
//! and stored by the backend as an opaque string inside a remote record, so
//! the field names here are the ones every historical client has written
//! (`drawingId`, `lineWidth`, `pathData`, `user`). Decoding also accepts the
//! descriptive aliases `id`, `points` and `authorId`.
//!
//! The [`UserRegistry`] is the per-session accumulation of every stroke
//! fetched so far. It is rebuilt from scratch by replaying fetch results and
//! is never persisted.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;
use time::macros::format_description;
use uuid::Uuid;

use crate::viewport::Point;

/// Length of the random suffix appended to generated ids.
const ID_SUFFIX_LEN: usize = 5;

/// A finished stroke as stored in the registry and on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Client-generated identifier: `stroke_<unix-millis>_<suffix>`.
    #[serde(rename = "drawingId", alias = "id")]
    pub id: String,
    /// CSS color string.
    pub color: String,
    /// Line width in canvas pixels.
    #[serde(rename = "lineWidth", deserialize_with = "de_line_width")]
    pub line_width: f64,
    /// Points in canvas buffer coordinates, in drawing order.
    #[serde(rename = "pathData", alias = "points", default)]
    pub points: Vec<Point>,
    /// RFC 3339 time at which the stroke was finished.
    #[serde(default)]
    pub timestamp: String,
    /// Author as recorded by the store. Absent on strokes that have not round-tripped.
    #[serde(rename = "user", alias = "authorId", default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl Stroke {
    /// Encode the stroke as the JSON string carried in a remote record's `value`.
    ///
    /// # Errors
    ///
    /// Returns the serializer error; in practice only non-finite coordinates fail.
    pub fn to_value(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a stroke from a remote record's `value`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `value` is not a JSON object with the stroke fields.
    pub fn from_value(value: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(value)
    }

    /// Whether this stroke was drawn by `author`.
    #[must_use]
    pub fn is_by(&self, author: &str) -> bool {
        self.author.as_deref() == Some(author)
    }
}

/// Older clients wrote `lineWidth` straight from a range input, i.e. as a string.
fn de_line_width<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Width {
        Number(f64),
        Text(String),
    }

    match Width::deserialize(deserializer)? {
        Width::Number(n) => Ok(n),
        Width::Text(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}

/// Generate a stroke id from the current time plus a random suffix.
#[must_use]
pub fn generate_stroke_id(now_ms: i64) -> String {
    format!("stroke_{now_ms}_{}", random_suffix())
}

/// Generate a session user id from the current time plus a random suffix.
#[must_use]
pub fn generate_user_id(now_ms: i64) -> String {
    format!("user_{now_ms}_{}", random_suffix())
}

fn random_suffix() -> String {
    Uuid::new_v4().simple().to_string().chars().take(ID_SUFFIX_LEN).collect()
}

/// Format unix milliseconds as a UTC ISO 8601 timestamp with millisecond precision. Empty if out of range.
#[must_use]
pub fn iso_timestamp(now_ms: i64) -> String {
    let nanos = i128::from(now_ms) * 1_000_000;
    let Ok(at) = OffsetDateTime::from_unix_timestamp_nanos(nanos) else {
        return String::new();
    };
    at.format(format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"))
        .unwrap_or_default()
}

/// Outcome of decoding one fetch response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrokeBatch {
    /// Strokes that decoded, in arrival order.
    pub strokes: Vec<Stroke>,
    /// Number of remote records the response contained, decodable or not.
    pub consumed: usize,
    /// Number of records dropped because their `value` was empty or malformed.
    pub skipped: usize,
}

/// Per-session accumulation of every stroke fetched so far.
#[derive(Debug, Clone)]
pub struct UserRegistry {
    user_id: String,
    username: String,
    strokes: Vec<Stroke>,
    cursor: usize,
}

impl UserRegistry {
    #[must_use]
    pub fn new(user_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self { user_id: user_id.into(), username: username.into(), strokes: Vec::new(), cursor: 0 }
    }

    /// A registry for a fresh page load, with a generated user id.
    #[must_use]
    pub fn generate(now_ms: i64, username: impl Into<String>) -> Self {
        Self::new(generate_user_id(now_ms), username)
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// All strokes in arrival order.
    #[must_use]
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Number of remote records consumed so far; the offset of the next fetch.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Append a decoded batch and advance the cursor past every record it consumed.
    pub fn apply_batch(&mut self, batch: StrokeBatch) {
        self.strokes.extend(batch.strokes);
        self.cursor += batch.consumed;
    }

    /// Drop every stroke and rewind the cursor. The user identity is kept.
    pub fn reset(&mut self) {
        self.strokes.clear();
        self.cursor = 0;
    }
}
