//! Secured-site registry.
//!
//! # Data Flow
//! ```text
//! Certificates/<domain>.crt   (issued elsewhere)
//!     → secured()                          which sites are TLS-enabled
//!     → resecure_for_new_configuration()   rebuild Nginx/<domain>
//!
//! stub text
//!     → replace_loopback()                 default loopback → configured
//! Nginx/*
//!     → alias_loopback(old, new)           bulk rewrite of listen addresses
//! ```
//!
//! # Design Decisions
//! - Certificates are only read here, never issued
//! - Server blocks are rebuilt wholesale, never patched

pub mod certificates;

use std::fmt::Debug;

use thiserror::Error;

use crate::config::{GlobalSettings, SettingsError};
use crate::fs::FsError;
use crate::template::TemplateError;

pub use certificates::CertificateSites;

/// Errors raised by the site registry.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Filesystem(#[from] FsError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    /// A site cannot be secured because no certificate exists for it.
    #[error("no certificate for {domain}; secure it again to issue one")]
    CertificateMissing { domain: String },
}

/// Result type for site registry operations.
pub type SiteResult<T> = Result<T, SiteError>;

/// Tracks secured sites and owns their generated server blocks.
pub trait SiteRegistry: Send + Sync + Debug {
    /// Domains currently secured with TLS.
    fn secured(&self) -> SiteResult<Vec<String>>;

    /// Rewrite default loopback references in `text` to the configured one.
    fn replace_loopback(&self, text: &str) -> SiteResult<String>;

    /// Replace `old` loopback references with `new` in every site file.
    fn alias_loopback(&self, old: &str, new: &str) -> SiteResult<()>;

    /// Rebuild every secured site's server block for `new`.
    fn resecure_for_new_configuration(
        &self,
        old: &GlobalSettings,
        new: &GlobalSettings,
    ) -> SiteResult<()>;
}

/// Rewrite `<from>:` listen addresses to `<to>:`.
///
/// Only address:port pairs are touched so unrelated mentions survive.
pub fn rewrite_loopback(text: &str, from: &str, to: &str) -> String {
    if from == to {
        return text.to_string();
    }
    text.replace(&format!("{from}:"), &format!("{to}:"))
}
