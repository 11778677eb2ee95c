//! Store configuration from the environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::error::StoreError;

pub const DEFAULT_PORT: u16 = 10010;
pub const DEFAULT_BIND_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { bind_addr: DEFAULT_BIND_ADDR, port: DEFAULT_PORT }
    }
}

impl StoreConfig {
    /// Read `BIND_ADDR` and `PORT`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidConfig`] if either is set but unparsable.
    pub fn from_env() -> Result<Self, StoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`StoreConfig::from_env`] with an explicit variable source.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidConfig`] if a value is set but unparsable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, StoreError> {
        let mut config = Self::default();
        if let Some(raw) = lookup("BIND_ADDR") {
            config.bind_addr = parse_var("BIND_ADDR", &raw)?;
        }
        if let Some(raw) = lookup("PORT") {
            config.port = parse_var("PORT", &raw)?;
        }
        Ok(config)
    }

    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, StoreError> {
    raw.trim().parse().map_err(|_| StoreError::InvalidConfig { key, value: raw.to_owned() })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
