use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

use crate::event::{NoRoomPolicy, StoreOptions};
use crate::room::DEFAULT_PENDING_CAPACITY;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime configuration, read from `ROOMLOG_*` environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: String,
    pub no_room_policy: NoRoomPolicy,
    pub pending_capacity: usize,
    pub strict_payloads: bool,
    /// Rooms opened at startup; the first one becomes current
    pub rooms: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            no_room_policy: NoRoomPolicy::Drop,
            pending_capacity: DEFAULT_PENDING_CAPACITY,
            strict_payloads: cfg!(debug_assertions),
            rooms: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup, falling back to defaults for missing keys
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup("ROOMLOG_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(raw) = lookup("ROOMLOG_NO_ROOM_POLICY") {
            config.no_room_policy = NoRoomPolicy::from_str(raw.trim()).map_err(|_| {
                ConfigError::Invalid {
                    key: "ROOMLOG_NO_ROOM_POLICY",
                    value: raw.clone(),
                    reason: "expected drop, buffer or fail".to_string(),
                }
            })?;
        }
        if let Some(raw) = lookup("ROOMLOG_PENDING_CAPACITY") {
            config.pending_capacity =
                raw.trim().parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                    key: "ROOMLOG_PENDING_CAPACITY",
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
        }
        if let Some(raw) = lookup("ROOMLOG_STRICT_PAYLOADS") {
            config.strict_payloads = parse_bool(&raw).ok_or_else(|| ConfigError::Invalid {
                key: "ROOMLOG_STRICT_PAYLOADS",
                value: raw.clone(),
                reason: "expected true, false, 1 or 0".to_string(),
            })?;
        }
        if let Some(raw) = lookup("ROOMLOG_ROOMS") {
            config.rooms = raw
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
        }

        debug!(config = ?config, "Loaded configuration");
        Ok(config)
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            no_room_policy: self.no_room_policy,
            strict_payloads: self.strict_payloads,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
