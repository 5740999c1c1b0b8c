//! Cross-process exclusive lock.
//!
//! Used by the dump command so two dumps into the same output directory
//! never interleave. The lock is held for as long as the guard lives and is
//! released on drop (or when the process exits).

use fs2::FileExt;
use std::{
    fs::{File, OpenOptions},
    io,
    path::{Path, PathBuf},
};

/// Exclusive lock guard backed by an `flock`-style file lock.
#[derive(Debug)]
pub struct ProcessLock {
    file: File,
    path: PathBuf,
}

impl ProcessLock {
    /// Try to take the lock at `path` without blocking.
    ///
    /// Returns `Ok(None)` when another holder has it.
    pub fn try_acquire(path: &Path) -> io::Result<Option<Self>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(path)?;

        match FileExt::try_lock_exclusive(&file) {
            Ok(()) => Ok(Some(Self {
                file,
                path: path.to_path_buf(),
            })),
            Err(err) if is_contended(&err) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Lock path for a command scoped to one output directory.
    pub fn path_for(command: &str, scope: &Path) -> PathBuf {
        let key = super::hash::fingerprint(scope.as_os_str().as_encoded_bytes());
        std::env::temp_dir().join(format!("assetpipe.{command}.{key}.lock"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ProcessLock {
    fn drop(&mut self) {
        FileExt::unlock(&self.file).ok();
    }
}

fn is_contended(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_second_acquire_refused() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dump.lock");

        let first = ProcessLock::try_acquire(&path).unwrap();
        assert!(first.is_some());

        let second = ProcessLock::try_acquire(&path).unwrap();
        assert!(second.is_none());
    }

    #[test]
    fn test_released_on_drop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("dump.lock");

        let first = ProcessLock::try_acquire(&path).unwrap().unwrap();
        assert_eq!(first.path(), path);
        drop(first);

        assert!(ProcessLock::try_acquire(&path).unwrap().is_some());
    }

    #[test]
    fn test_path_for_is_scoped() {
        let a = ProcessLock::path_for("dump", Path::new("/srv/web"));
        let b = ProcessLock::path_for("dump", Path::new("/srv/other"));
        assert_ne!(a, b);
        assert_eq!(a, ProcessLock::path_for("dump", Path::new("/srv/web")));
        assert!(a.to_string_lossy().ends_with(".lock"));
    }
}
