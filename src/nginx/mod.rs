//! Proxy configuration manager.
//!
//! # Data Flow
//! ```text
//! install()
//!     → ServiceController::has_installed_nginx / install_or_fail
//!     → install_configuration()    nginx.conf
//!     → install_server()           valet/valet.conf + fastcgi_params
//!     → install_nginx_directory()  ~/.config/valet/Nginx + .keep
//!         → rewrite_secure_nginx_files()
//!             → SiteRegistry::alias_loopback (only for a custom loopback)
//!             → SiteRegistry::resecure_for_new_configuration
//!
//! restart() → lint() → ServiceController::restart_service
//! stop()    → ServiceController::stop_service
//! uninstall() → stop both variants → uninstall packages → remove dirs
//! ```
//!
//! # Design Decisions
//! - Synchronous, run-to-completion; every failure is returned, none retried
//! - Steps run in dependency order with no rollback
//! - Global settings are read fresh and must be complete before any site
//!   file is regenerated
//! - Only `uninstall` is best-effort, and only across service variants

mod install;
mod lifecycle;
mod lint;
mod reconfigure;
mod sites;
pub mod types;

use std::sync::Arc;

use crate::config::{ConfigContext, ProxyPaths, SettingsStore};
use crate::fs::Filesystem;
use crate::process::CommandRunner;
use crate::service::ServiceController;
use crate::site::SiteRegistry;

pub use types::{NginxError, NginxResult};

/// Collaborators the manager delegates to.
#[derive(Debug, Clone)]
pub struct Collaborators {
    pub installer: Arc<dyn ServiceController>,
    pub site: Arc<dyn SiteRegistry>,
    pub files: Arc<dyn Filesystem>,
    pub cli: Arc<dyn CommandRunner>,
}

/// Installs, configures and controls the local nginx.
#[derive(Debug, Clone)]
pub struct Nginx {
    paths: ProxyPaths,
    context: ConfigContext,
    settings: SettingsStore,
    installer: Arc<dyn ServiceController>,
    site: Arc<dyn SiteRegistry>,
    files: Arc<dyn Filesystem>,
    cli: Arc<dyn CommandRunner>,
}

impl Nginx {
    pub fn new(
        paths: ProxyPaths,
        context: ConfigContext,
        settings: SettingsStore,
        collaborators: Collaborators,
    ) -> Self {
        Self {
            paths,
            context,
            settings,
            installer: collaborators.installer,
            site: collaborators.site,
            files: collaborators.files,
            cli: collaborators.cli,
        }
    }

    pub fn paths(&self) -> &ProxyPaths {
        &self.paths
    }

    pub fn context(&self) -> &ConfigContext {
        &self.context
    }
}
