//! Persisted global settings (`config.json`).
//!
//! The file is shared with the rest of the environment manager, so it is read
//! fresh on every call and unknown keys are preserved on write.

use std::fs;
use std::io;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// The managed TLD and loopback address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettings {
    pub tld: String,
    pub loopback: String,
}

/// Why the global settings could not be used.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file {} does not exist; run install first", .0.display())]
    NotFound(PathBuf),

    #[error("could not access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("settings file {} is not valid JSON: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("setting `{0}` is missing or empty")]
    Missing(&'static str),

    #[error("loopback `{0}` is not an IPv4 address")]
    InvalidLoopback(String),
}

/// Reads and initializes `config.json`.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current settings. Never cached.
    pub fn read(&self) -> Result<GlobalSettings, SettingsError> {
        let document = self.read_document()?;

        let tld = required(&document, "tld")?;
        let loopback = required(&document, "loopback")?;
        if loopback.parse::<Ipv4Addr>().is_err() {
            return Err(SettingsError::InvalidLoopback(loopback));
        }

        Ok(GlobalSettings { tld, loopback })
    }

    /// Write `defaults` for any setting that is missing, keeping other keys.
    ///
    /// Returns the effective settings.
    pub fn ensure_initialized(&self, defaults: &GlobalSettings) -> Result<GlobalSettings, SettingsError> {
        let mut document = match self.read_document() {
            Ok(document) => document,
            Err(SettingsError::NotFound(_)) => Map::new(),
            Err(e) => return Err(e),
        };

        let mut changed = false;
        for (key, value) in [("tld", &defaults.tld), ("loopback", &defaults.loopback)] {
            let present = document
                .get(key)
                .and_then(Value::as_str)
                .is_some_and(|v| !v.trim().is_empty());
            if !present {
                document.insert(key.to_string(), Value::String(value.clone()));
                changed = true;
            }
        }

        if changed {
            tracing::info!(path = %self.path.display(), "Initializing global settings");
            self.write_document(&document)?;
        }

        self.read()
    }

    fn read_document(&self) -> Result<Map<String, Value>, SettingsError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(SettingsError::NotFound(self.path.clone()))
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&content).map_err(|source| SettingsError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    fn write_document(&self, document: &Map<String, Value>) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let body = serde_json::to_string_pretty(document).map_err(|source| SettingsError::Malformed {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, body + "\n").map_err(io_err)
    }
}

fn required(document: &Map<String, Value>, key: &'static str) -> Result<String, SettingsError> {
    document
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or(SettingsError::Missing(key))
}
