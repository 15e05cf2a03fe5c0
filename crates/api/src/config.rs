//! Process configuration read from the environment at startup.

use std::net::SocketAddr;

use shopledger_observability::LogFormat;
use thiserror::Error;

pub const BIND_ADDR_VAR: &str = "SHOPLEDGER_BIND_ADDR";
pub const SEED_CATALOG_VAR: &str = "SHOPLEDGER_SEED_CATALOG";
pub const LOG_FORMAT_VAR: &str = "SHOPLEDGER_LOG_FORMAT";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// Load the default catalog at startup (otherwise the store starts empty).
    pub seed_catalog: bool,
    pub log_format: LogFormat,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source. Unset variables take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw = lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
            var: BIND_ADDR_VAR,
            value: raw.clone(),
            reason: e.to_string(),
        })?;

        let seed_catalog = match lookup(SEED_CATALOG_VAR) {
            None => true,
            Some(v) => parse_bool(&v).ok_or_else(|| ConfigError::Invalid {
                var: SEED_CATALOG_VAR,
                value: v.clone(),
                reason: "expected true or false".to_string(),
            })?,
        };

        let log_format = match lookup(LOG_FORMAT_VAR) {
            None => LogFormat::default(),
            Some(v) => v.parse().map_err(|reason| ConfigError::Invalid {
                var: LOG_FORMAT_VAR,
                value: v.clone(),
                reason,
            })?,
        };

        Ok(Self {
            bind_addr,
            seed_catalog,
            log_format,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
