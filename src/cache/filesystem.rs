use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

/// Key → bytes store backed by one file per key.
#[derive(Debug, Clone)]
pub struct FilesystemCache {
    dir: PathBuf,
}

impl FilesystemCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.entry(key).is_file()
    }

    pub fn get(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.entry(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Store `content`; the entry appears atomically.
    ///
    /// Each writer gets its own scratch file, so concurrent writers of one
    /// key never interleave.
    pub fn set(&self, key: &str, content: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content)?;
        tmp.persist(self.entry(key)).map_err(|e| e.error)?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.entry(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_get() {
        let dir = TempDir::new().unwrap();
        let cache = FilesystemCache::new(dir.path().join("assets"));

        assert!(!cache.has("k"));
        assert_eq!(cache.get("k").unwrap(), None);

        cache.set("k", b"body{}").unwrap();
        assert!(cache.has("k"));
        assert_eq!(cache.get("k").unwrap().as_deref(), Some(&b"body{}"[..]));

        cache.remove("k").unwrap();
        cache.remove("k").unwrap();
        assert!(!cache.has("k"));
    }

    #[test]
    fn test_concurrent_set_never_partial() {
        let dir = TempDir::new().unwrap();
        let cache = FilesystemCache::new(dir.path());
        let value = vec![b'x'; 1 << 20];

        for _ in 0..10 {
            std::thread::scope(|s| {
                for _ in 0..4 {
                    s.spawn(|| {
                        cache.set("k", &value).unwrap();
                        let read = cache.get("k").unwrap().unwrap();
                        assert_eq!(read.len(), value.len());
                    });
                }
            });
        }

        // No scratch files left behind
        let entries = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }
}
