//! Error definitions for the proxy manager.

use thiserror::Error;

use crate::config::SettingsError;
use crate::fs::FsError;
use crate::process::CommandError;
use crate::service::ServiceError;
use crate::site::SiteError;
use crate::template::TemplateError;

/// Errors that can occur while managing nginx.
#[derive(Debug, Error)]
pub enum NginxError {
    /// The package installer could not install nginx.
    #[error("nginx installation failed: {0}")]
    Installation(#[source] ServiceError),

    /// `nginx -t` rejected the configuration.
    #[error("nginx configuration is invalid (exit code {code}):\n{output}")]
    ConfigurationInvalid { code: i32, output: String },

    /// A write, directory creation, scan or removal failed.
    #[error(transparent)]
    Filesystem(#[from] FsError),

    /// TLD or loopback is absent or malformed.
    #[error("global settings are unusable: {0}")]
    MissingConfiguration(#[from] SettingsError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    /// A service command other than installation failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Site(SiteError),

    #[error(transparent)]
    Command(#[from] CommandError),
}

impl From<SiteError> for NginxError {
    fn from(err: SiteError) -> Self {
        match err {
            SiteError::Settings(e) => NginxError::MissingConfiguration(e),
            SiteError::Filesystem(e) => NginxError::Filesystem(e),
            SiteError::Template(e) => NginxError::Template(e),
            other => NginxError::Site(other),
        }
    }
}

impl NginxError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            NginxError::MissingConfiguration(_) => 2,
            NginxError::ConfigurationInvalid { .. } => 3,
            NginxError::Installation(_) => 4,
            _ => 1,
        }
    }
}

/// Result type for manager operations.
pub type NginxResult<T> = Result<T, NginxError>;
