//! Filesystem abstraction.
//!
//! # Responsibilities
//! - Owner-aware writes: files written while elevated end up owned by the
//!   invoking user
//! - Directory creation, scanning and forced removal
//!
//! # Design Decisions
//! - A trait seam so the manager can be exercised against a sandbox
//! - Every error carries the path it happened on

pub mod local;

use std::fmt::Debug;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::Identity;

pub use local::LocalFilesystem;

/// A filesystem operation failed.
#[derive(Debug, Error)]
#[error("{op} {}: {source}", path.display())]
pub struct FsError {
    pub op: &'static str,
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl FsError {
    pub fn new(op: &'static str, path: &Path, source: io::Error) -> Self {
        Self {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type for filesystem operations.
pub type FsResult<T> = Result<T, FsError>;

/// Filesystem operations the manager and site registry rely on.
pub trait Filesystem: Send + Sync + Debug {
    fn is_dir(&self, path: &Path) -> bool;

    fn exists(&self, path: &Path) -> bool;

    fn read_to_string(&self, path: &Path) -> FsResult<String>;

    /// Create `path` (and parents) if absent, owned by `owner`.
    fn ensure_dir_as_user(&self, path: &Path, owner: &Identity) -> FsResult<()>;

    /// Replace `path` with `contents`, owned by `owner` once this returns
    /// successfully. On failure the previous file is left untouched.
    fn put_as_user(&self, path: &Path, contents: &str, owner: &Identity) -> FsResult<()>;

    /// Names of the entries in `path`, in scan order.
    fn scandir(&self, path: &Path) -> FsResult<Vec<String>>;

    /// Remove a file; a missing file is not an error.
    fn remove_file(&self, path: &Path) -> FsResult<()>;

    /// Remove a directory tree; a missing directory is not an error.
    fn remove_dir_all(&self, path: &Path) -> FsResult<()>;
}
