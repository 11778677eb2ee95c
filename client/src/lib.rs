//! Client side of the shared drawing board: the store gateway and the session
//! driver that ties the canvas controller to it.
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `ClientConfig` from environment variables |
//! | [`gateway`] | `Gateway` trait, reqwest-backed `HttpGateway`, record decoding |
//! | [`session`] | `Session`: pointer events → submit → refresh → replay |

pub mod config;
pub mod gateway;
pub mod session;

pub use config::{ClientConfig, ConfigError};
pub use gateway::{Gateway, GatewayError, HttpGateway};
pub use session::{Host, Session};
