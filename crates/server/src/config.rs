// SPDX-License-Identifier: MIT

//! Layered configuration: built-in defaults, then an optional TOML file
//! (`$PUSHPALS_CONFIG`, default `./pushpals.toml`), then environment
//! variables — the same override-chain shape as the daemon's `env.rs`
//! `state_dir()`/`ipc_timeout()` functions, generalized into one loader
//! and extended with a TOML layer (spec.md §6 "Environment", SPEC_FULL.md
//! §2.3).

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_HEARTBEAT_TTL_MS: u64 = 15_000;
const DEFAULT_WATCHDOG_TICK_MS: u64 = 1_000;
const DEFAULT_SUBSCRIBER_BUFFER: usize = 256;
const DEFAULT_WORKER_LOST_MAX_REQUEUES: u32 = 3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid value for {var}: {value}")]
    InvalidEnvVar { var: &'static str, value: String },
}

/// TOML-shaped overlay loaded before environment variables. Every field is
/// optional so a partial file only overrides what it names.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileConfig {
    session_id: Option<String>,
    auth_token: Option<String>,
    bind_addr: Option<String>,
    state_dir: Option<PathBuf>,
    heartbeat_ttl_ms: Option<u64>,
    watchdog_tick_ms: Option<u64>,
    subscriber_buffer: Option<usize>,
    worker_lost_max_requeues: Option<u32>,
}

/// Resolved server configuration.
#[derive(Debug, Clone)]
pub struct PushPalsConfig {
    pub session_id: Option<String>,
    pub auth_token: Option<String>,
    pub bind_addr: String,
    pub state_dir: PathBuf,
    pub heartbeat_ttl_ms: u64,
    pub watchdog_tick_ms: u64,
    pub subscriber_buffer: usize,
    pub worker_lost_max_requeues: u32,
}

impl Default for PushPalsConfig {
    fn default() -> Self {
        Self {
            session_id: None,
            auth_token: None,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            state_dir: default_state_dir(),
            heartbeat_ttl_ms: DEFAULT_HEARTBEAT_TTL_MS,
            watchdog_tick_ms: DEFAULT_WATCHDOG_TICK_MS,
            subscriber_buffer: DEFAULT_SUBSCRIBER_BUFFER,
            worker_lost_max_requeues: DEFAULT_WORKER_LOST_MAX_REQUEUES,
        }
    }
}

fn default_state_dir() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pushpals")
}

impl PushPalsConfig {
    /// Load defaults, then `$PUSHPALS_CONFIG` (default `./pushpals.toml`) if
    /// present, then environment variables. `.env` is loaded first via
    /// `dotenvy` for local development, matching `fourthplaces-mntogether`
    /// and `adamtc007-ob-poc`.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        let config_path = std::env::var("PUSHPALS_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./pushpals.toml"));
        if config_path.exists() {
            let text =
                std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
                    path: config_path.clone(),
                    source,
                })?;
            let file: FileConfig =
                toml::from_str(&text).map_err(|source| ConfigError::Parse {
                    path: config_path.clone(),
                    source,
                })?;
            config.apply_file(file);
        }

        config.apply_env()?;
        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(v) = file.session_id {
            self.session_id = Some(v);
        }
        if let Some(v) = file.auth_token {
            self.auth_token = Some(v);
        }
        if let Some(v) = file.bind_addr {
            self.bind_addr = v;
        }
        if let Some(v) = file.state_dir {
            self.state_dir = v;
        }
        if let Some(v) = file.heartbeat_ttl_ms {
            self.heartbeat_ttl_ms = v;
        }
        if let Some(v) = file.watchdog_tick_ms {
            self.watchdog_tick_ms = v;
        }
        if let Some(v) = file.subscriber_buffer {
            self.subscriber_buffer = v;
        }
        if let Some(v) = file.worker_lost_max_requeues {
            self.worker_lost_max_requeues = v;
        }
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(v) = std::env::var("PUSHPALS_SESSION_ID") {
            self.session_id = Some(v);
        }
        if let Ok(v) = std::env::var("PUSHPALS_AUTH_TOKEN") {
            if !v.is_empty() {
                self.auth_token = Some(v);
            }
        }
        if let Ok(v) = std::env::var("PUSHPALS_BIND_ADDR") {
            self.bind_addr = v;
        }
        if let Ok(v) = std::env::var("PUSHPALS_STATE_DIR") {
            self.state_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("PUSHPALS_HEARTBEAT_TTL_MS") {
            self.heartbeat_ttl_ms = v.parse().map_err(|_| ConfigError::InvalidEnvVar {
                var: "PUSHPALS_HEARTBEAT_TTL_MS",
                value: v,
            })?;
        }
        if let Ok(v) = std::env::var("PUSHPALS_WATCHDOG_TICK_MS") {
            self.watchdog_tick_ms = v.parse().map_err(|_| ConfigError::InvalidEnvVar {
                var: "PUSHPALS_WATCHDOG_TICK_MS",
                value: v,
            })?;
        }
        if let Ok(v) = std::env::var("PUSHPALS_SUBSCRIBER_BUFFER") {
            self.subscriber_buffer = v.parse().map_err(|_| ConfigError::InvalidEnvVar {
                var: "PUSHPALS_SUBSCRIBER_BUFFER",
                value: v,
            })?;
        }
        if let Ok(v) = std::env::var("PUSHPALS_WORKER_LOST_MAX_REQUEUES") {
            self.worker_lost_max_requeues = v.parse().map_err(|_| ConfigError::InvalidEnvVar {
                var: "PUSHPALS_WORKER_LOST_MAX_REQUEUES",
                value: v,
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
