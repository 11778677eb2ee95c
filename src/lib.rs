//! Development stand-in for the ledger-backed stroke store.
//!
//! | Module | Role |
//! |--------|------|
//! | `config` | `PORT` / `BIND_ADDR` from the environment |
//! | `error` | `StoreError` and its HTTP mapping |
//! | `routes` | axum router: submit, fetch, health |
//! | `state` | append-only in-memory record log |

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::StoreConfig;
pub use error::StoreError;
pub use state::StoreState;

use tokio::net::TcpListener;

/// Serve the store on an already-bound listener until the server stops.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the server fails.
pub async fn serve(listener: TcpListener, state: StoreState) -> Result<(), StoreError> {
    axum::serve(listener, routes::app(state)).await?;
    Ok(())
}
