//! Configuration schema definitions.
//!
//! The manager reads an optional `nginx.toml` from the Valet home directory.
//! Every field has a default, so an empty (or missing) file is valid.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default loopback address compiled into the generated server blocks.
pub const DEFAULT_LOOPBACK: &str = "127.0.0.1";

/// Prefix nginx uses to serve static assets through the front controller.
pub const DEFAULT_STATIC_PREFIX: &str = "41c270e4-5535-4daa-b23e-c269744c2f45";

/// Root configuration for the manager.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ManagerConfig {
    /// Filesystem locations.
    pub paths: PathsConfig,

    /// Values substituted into the server blocks.
    pub server: ServerConfig,

    /// Package and service names.
    pub service: ServiceConfig,

    /// Log output.
    pub logging: LoggingConfig,
}

/// Path overrides. Unset values are derived from the host OS.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    /// System configuration root (e.g. `/opt/homebrew/etc`).
    pub etc_dir: Option<PathBuf>,

    /// Nginx log directory.
    pub log_dir: Option<PathBuf>,

    /// Valet home (defaults to `~/.config/valet`).
    pub valet_home: Option<PathBuf>,
}

/// Server block values.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// The nginx executable used for syntax checks.
    pub binary: String,

    /// Front controller every request is rewritten to.
    pub server_path: Option<PathBuf>,

    /// Internal location prefix for static assets.
    pub static_prefix: String,

    /// Loopback the stubs are written against.
    pub default_loopback: String,

    /// TLD written to `config.json` on first install.
    pub default_tld: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            binary: "nginx".to_string(),
            server_path: None,
            static_prefix: DEFAULT_STATIC_PREFIX.to_string(),
            default_loopback: DEFAULT_LOOPBACK.to_string(),
            default_tld: "test".to_string(),
        }
    }
}

/// Package manager and service names.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServiceConfig {
    /// Package manager executable.
    pub brew: String,

    /// Primary nginx package.
    pub primary: String,

    /// Alternative package with extra modules.
    pub full: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            brew: "brew".to_string(),
            primary: "nginx".to_string(),
            full: "nginx-full".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Every package variant that may be installed.
    pub fn variants(&self) -> [&str; 2] {
        [self.primary.as_str(), self.full.as_str()]
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
