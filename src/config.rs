// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup into an [`AppConfig`] that is handed to the application
//! state explicitly.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `ADMIN_USERNAME` | Administrator identity | `admin` |
//! | `ADMIN_PASSWORD` | Administrator password | `admin` |
//! | `SANDBOX_NAME` | Name of the sandbox node under the tree root | `oh` |
//! | `DATA_DIR` | Directory for the repository snapshot | unset (memory only) |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::path::PathBuf;

use crate::engine::{path, AdminAccount, Credentials};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const ADMIN_USERNAME_ENV: &str = "ADMIN_USERNAME";
pub const ADMIN_PASSWORD_ENV: &str = "ADMIN_PASSWORD";
pub const SANDBOX_NAME_ENV: &str = "SANDBOX_NAME";

/// Environment variable name for the snapshot directory.
///
/// When unset the repository lives in memory only and is lost on restart.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin";
pub const DEFAULT_SANDBOX_NAME: &str = "oh";

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be a port number, got {0:?}")]
    InvalidPort(String),
    #[error("SANDBOX_NAME must be a single node name, got {0:?}")]
    InvalidSandboxName(String),
    #[error("LOG_FORMAT must be 'json' or 'pretty', got {0:?}")]
    InvalidLogFormat(String),
    #[error("ADMIN_USERNAME must not be empty")]
    EmptyAdminUsername,
}

/// Application configuration.
#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub admin_username: String,
    pub admin_password: String,
    pub sandbox_name: String,
    pub data_dir: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            admin_username: DEFAULT_ADMIN_USERNAME.to_string(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            sandbox_name: DEFAULT_SANDBOX_NAME.to_string(),
            data_dir: None,
            log_format: LogFormat::default(),
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("admin_username", &self.admin_username)
            .field("sandbox_name", &self.sandbox_name)
            .field("data_dir", &self.data_dir)
            .field("log_format", &self.log_format)
            .finish_non_exhaustive()
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match lookup(PORT_ENV) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => defaults.port,
        };

        let sandbox_name = lookup(SANDBOX_NAME_ENV).unwrap_or(defaults.sandbox_name);
        if path::validate_name(&sandbox_name).is_err() {
            return Err(ConfigError::InvalidSandboxName(sandbox_name));
        }

        let admin_username = lookup(ADMIN_USERNAME_ENV).unwrap_or(defaults.admin_username);
        if admin_username.is_empty() {
            return Err(ConfigError::EmptyAdminUsername);
        }

        let log_format = match lookup(LOG_FORMAT_ENV).as_deref() {
            None => defaults.log_format,
            Some(raw) if raw.eq_ignore_ascii_case("json") => LogFormat::Json,
            Some(raw) if raw.eq_ignore_ascii_case("pretty") => LogFormat::Pretty,
            Some(raw) => return Err(ConfigError::InvalidLogFormat(raw.to_string())),
        };

        Ok(Self {
            host: lookup(HOST_ENV).unwrap_or(defaults.host),
            port,
            admin_username,
            admin_password: lookup(ADMIN_PASSWORD_ENV).unwrap_or(defaults.admin_password),
            sandbox_name,
            data_dir: lookup(DATA_DIR_ENV).map(PathBuf::from),
            log_format,
        })
    }

    /// Absolute path of the sandbox root.
    pub fn sandbox_root(&self) -> String {
        path::child(path::ROOT_PATH, &self.sandbox_name)
    }

    /// Credentials of the elevated session.
    pub fn admin_credentials(&self) -> Credentials {
        Credentials::new(&self.admin_username, &self.admin_password)
    }

    /// The account the repository accepts logins for.
    pub fn admin_account(&self) -> AdminAccount {
        AdminAccount::new(&self.admin_username, &self.admin_password)
    }

    /// `host:port` to bind the listener to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
