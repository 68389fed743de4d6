//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value shapes (loopback is an IP, names are non-empty)
//! - Reject values that would corrupt generated nginx files
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ManagerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::Ipv4Addr;

use thiserror::Error;

use crate::config::schema::ManagerConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the manager configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("server.default_loopback `{0}` is not an IPv4 address")]
    InvalidLoopback(String),

    #[error("server.static_prefix `{0}` must not contain `/` or whitespace")]
    InvalidStaticPrefix(String),

    #[error("server.default_tld `{0}` must not start with a dot")]
    InvalidTld(String),

    #[error("service.primary and service.full must differ (both `{0}`)")]
    DuplicateService(String),

    #[error("logging.level `{0}` is not one of trace, debug, info, warn, error")]
    InvalidLogLevel(String),
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ManagerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let required = [
        ("server.binary", &config.server.binary),
        ("server.static_prefix", &config.server.static_prefix),
        ("server.default_loopback", &config.server.default_loopback),
        ("server.default_tld", &config.server.default_tld),
        ("service.brew", &config.service.brew),
        ("service.primary", &config.service.primary),
        ("service.full", &config.service.full),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            errors.push(ValidationError::Empty { field });
        }
    }

    let loopback = &config.server.default_loopback;
    if !loopback.trim().is_empty() && loopback.parse::<Ipv4Addr>().is_err() {
        errors.push(ValidationError::InvalidLoopback(loopback.clone()));
    }

    let prefix = &config.server.static_prefix;
    if prefix.contains('/') || prefix.chars().any(char::is_whitespace) {
        errors.push(ValidationError::InvalidStaticPrefix(prefix.clone()));
    }

    if config.server.default_tld.starts_with('.') {
        errors.push(ValidationError::InvalidTld(config.server.default_tld.clone()));
    }

    if !config.service.primary.is_empty() && config.service.primary == config.service.full {
        errors.push(ValidationError::DuplicateService(config.service.primary.clone()));
    }

    if !LOG_LEVELS.contains(&config.logging.level.to_lowercase().as_str()) {
        errors.push(ValidationError::InvalidLogLevel(config.logging.level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
