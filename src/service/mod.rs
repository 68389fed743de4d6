//! Package installation and OS service control.
//!
//! # Responsibilities
//! - Report whether an nginx package is installed
//! - Install, restart, stop and uninstall named services/packages
//!
//! # Design Decisions
//! - The manager only sees the trait; Homebrew is one implementation
//! - Failures are reported, never retried

pub mod brew;

use std::fmt::Debug;

use thiserror::Error;

use crate::process::CommandError;

pub use brew::Brew;

/// Errors raised by a service controller.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Installing a package failed.
    #[error("could not install {name} (exit code {code}): {output}")]
    InstallFailed {
        name: String,
        code: i32,
        output: String,
    },

    /// A service or package command exited unsuccessfully.
    #[error("`{action} {name}` failed (exit code {code}): {output}")]
    CommandFailed {
        action: &'static str,
        name: String,
        code: i32,
        output: String,
    },

    /// The command could not be started at all.
    #[error(transparent)]
    Command(#[from] CommandError),
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Installs and controls the nginx service.
pub trait ServiceController: Send + Sync + Debug {
    /// Whether any nginx package variant is installed.
    fn has_installed_nginx(&self) -> ServiceResult<bool>;

    /// Install a package, failing with [`ServiceError::InstallFailed`].
    fn install_or_fail(&self, name: &str) -> ServiceResult<()>;

    fn restart_service(&self, name: &str) -> ServiceResult<()>;

    /// Stop every named service.
    fn stop_service(&self, names: &[&str]) -> ServiceResult<()>;

    /// Remove the named packages.
    fn uninstall_formula(&self, names: &[&str]) -> ServiceResult<()>;

    /// The name of the installed nginx service variant.
    fn nginx_service_name(&self) -> String;
}
