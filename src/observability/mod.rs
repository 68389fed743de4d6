//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (paths, services, codes)
//!
//! Consumers:
//!     → logging.rs (stderr, filtered by RUST_LOG or the configured level)
//! ```
//!
//! # Design Decisions
//! - Structured fields instead of formatted messages
//! - User-facing results go to stdout; logs go to stderr

pub mod logging;
