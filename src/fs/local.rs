//! Filesystem backed by the local disk.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use super::{Filesystem, FsError, FsResult};
use crate::config::Identity;

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> FsResult<String> {
        fs::read_to_string(path).map_err(|e| FsError::new("read", path, e))
    }

    fn ensure_dir_as_user(&self, path: &Path, owner: &Identity) -> FsResult<()> {
        if path.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(path).map_err(|e| FsError::new("create directory", path, e))?;
        set_owner(path, owner).map_err(|e| FsError::new("chown", path, e))?;
        tracing::debug!(path = %path.display(), owner = %owner.name, "Created directory");
        Ok(())
    }

    fn put_as_user(&self, path: &Path, contents: &str, owner: &Identity) -> FsResult<()> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        // The temp file is deleted on drop, so any early return leaves the
        // destination untouched and nothing behind.
        let mut staged =
            NamedTempFile::new_in(parent).map_err(|e| FsError::new("stage", path, e))?;
        staged
            .write_all(contents.as_bytes())
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|e| FsError::new("write", path, e))?;
        set_mode(staged.path()).map_err(|e| FsError::new("chmod", path, e))?;
        set_owner(staged.path(), owner).map_err(|e| FsError::new("chown", path, e))?;
        staged
            .persist(path)
            .map_err(|e| FsError::new("replace", path, e.error))?;

        tracing::debug!(path = %path.display(), owner = %owner.name, bytes = contents.len(), "Wrote file");
        Ok(())
    }

    fn scandir(&self, path: &Path) -> FsResult<Vec<String>> {
        let entries = fs::read_dir(path).map_err(|e| FsError::new("scan", path, e))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| FsError::new("scan", path, e))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    fn remove_file(&self, path: &Path) -> FsResult<()> {
        match fs::remove_file(path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(FsError::new("remove", path, e)),
            _ => Ok(()),
        }
    }

    fn remove_dir_all(&self, path: &Path) -> FsResult<()> {
        match fs::remove_dir_all(path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(FsError::new("remove", path, e)),
            _ => Ok(()),
        }
    }
}

#[cfg(unix)]
fn set_mode(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// Hand the file to `owner` when running as root. Without root the file is
/// already owned by the process user, which is the invoking user.
#[cfg(unix)]
fn set_owner(path: &Path, owner: &Identity) -> io::Result<()> {
    use nix::unistd::{chown, geteuid, Gid, Uid};

    if !geteuid().is_root() {
        return Ok(());
    }
    let (Some(uid), Some(gid)) = (owner.uid, owner.gid) else {
        return Ok(());
    };
    chown(path, Some(Uid::from_raw(uid)), Some(Gid::from_raw(gid))).map_err(io::Error::from)
}

#[cfg(not(unix))]
fn set_owner(_path: &Path, _owner: &Identity) -> io::Result<()> {
    Ok(())
}
