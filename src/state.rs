//! The append-only stroke log.
//!
//! DESIGN
//! ======
//! Records are only ever appended and never reordered, so the index of a
//! record is stable for the life of the process. Clients rely on that to
//! fetch "everything from offset N". Values are stored as received; the
//! store never inspects the stroke inside them.

use std::sync::Arc;

use records::{RemoteRecord, SubmitRequest};
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Shared store state, injected into handlers via the `State` extractor.
#[derive(Clone, Default)]
pub struct StoreState {
    log: Arc<RwLock<Vec<RemoteRecord>>>,
}

impl StoreState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a submitted stroke and return its assigned id.
    pub async fn append(&self, request: SubmitRequest) -> String {
        let id = Uuid::new_v4().to_string();
        let record = RemoteRecord {
            id: Value::String(id.clone()),
            value: Some(Value::String(request.value)),
            user: Some(request.user),
            timestamp: Some(request.ts),
            deletion_flag: Some(request.deletion_date_flag),
        };
        self.log.write().await.push(record);
        id
    }

    /// Append a record exactly as given.
    #[cfg(test)]
    pub async fn append_raw(&self, record: RemoteRecord) {
        self.log.write().await.push(record);
    }

    /// Every record at or past `offset`, in append order. Empty past the end.
    pub async fn records_from(&self, offset: usize) -> Vec<RemoteRecord> {
        let log = self.log.read().await;
        log.get(offset..).map(<[RemoteRecord]>::to_vec).unwrap_or_default()
    }

    pub async fn len(&self) -> usize {
        self.log.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.log.read().await.is_empty()
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
