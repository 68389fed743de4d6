//! Filesystem layout of the proxy.

use std::env;
use std::path::{Path, PathBuf};

use crate::config::schema::PathsConfig;

/// Locations nginx reads its configuration from and logs to.
///
/// Computed once at construction and shared, read-only, by every operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyPaths {
    /// `<etc>/nginx`
    pub config_dir: PathBuf,
    /// `<prefix>/var/log/nginx`
    pub log_dir: PathBuf,
    /// `<etc>/nginx/nginx.conf`
    pub main_config: PathBuf,
}

impl ProxyPaths {
    /// Derive the layout from a system configuration root and log directory.
    pub fn new(etc_dir: &Path, log_dir: &Path) -> Self {
        let config_dir = etc_dir.join("nginx");
        Self {
            main_config: config_dir.join("nginx.conf"),
            config_dir,
            log_dir: log_dir.to_path_buf(),
        }
    }

    /// Resolve the layout for this host, honoring explicit overrides.
    pub fn resolve(overrides: &PathsConfig) -> Self {
        let prefix = system_prefix();
        let etc_dir = overrides
            .etc_dir
            .clone()
            .unwrap_or_else(|| prefix.join("etc"));
        let log_dir = overrides
            .log_dir
            .clone()
            .unwrap_or_else(|| prefix.join("var").join("log").join("nginx"));
        Self::new(&etc_dir, &log_dir)
    }

    /// The manager's own server block directory.
    pub fn server_dir(&self) -> PathBuf {
        self.config_dir.join("valet")
    }

    /// `<etc>/nginx/valet/valet.conf`
    pub fn server_config(&self) -> PathBuf {
        self.server_dir().join("valet.conf")
    }

    /// `<etc>/nginx/fastcgi_params`
    pub fn fastcgi_params(&self) -> PathBuf {
        self.config_dir.join("fastcgi_params")
    }
}

/// Installation prefix the package manager uses on this host.
fn system_prefix() -> PathBuf {
    if let Some(prefix) = env::var_os("HOMEBREW_PREFIX").filter(|p| !p.is_empty()) {
        return PathBuf::from(prefix);
    }

    if cfg!(all(target_os = "macos", target_arch = "aarch64")) {
        PathBuf::from("/opt/homebrew")
    } else if cfg!(target_os = "macos") {
        PathBuf::from("/usr/local")
    } else {
        PathBuf::from("/")
    }
}
