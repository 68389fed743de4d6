//! Local Nginx Manager Library
//!
//! Installs nginx for a local development environment, generates its global
//! and per-site configuration, keeps that configuration in step with the
//! managed TLD and loopback address, and controls the service lifecycle.

pub mod config;
pub mod fs;
pub mod nginx;
pub mod observability;
pub mod process;
pub mod service;
pub mod site;
pub mod template;

pub use config::{ConfigContext, ManagerConfig, ProxyPaths};
pub use nginx::{Collaborators, Nginx, NginxError, NginxResult};
