//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! nginx.toml (optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ManagerConfig (validated, immutable)
//!     → paths.rs (ProxyPaths) + context.rs (ConfigContext)
//!     → passed by value to the manager and its collaborators
//!
//! config.json (shared with the rest of Valet)
//!     → settings.rs (GlobalSettings, read fresh on every use)
//! ```
//!
//! # Design Decisions
//! - Manager config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Global settings are never cached; other processes may change them

pub mod context;
pub mod loader;
pub mod paths;
pub mod schema;
pub mod settings;
pub mod validation;

pub use context::{ConfigContext, Identity};
pub use loader::ConfigError;
pub use paths::ProxyPaths;
pub use schema::ManagerConfig;
pub use schema::ServiceConfig;
pub use settings::{GlobalSettings, SettingsError, SettingsStore};
