use super::FilesystemCache;
use crate::{
    asset::{Asset, AssetError},
    debug,
    utils::hash::KeyHasher,
};
use std::{sync::Arc, time::UNIX_EPOCH};

/// Cache key covering every input of `asset`'s filtered content.
pub fn cache_key(asset: &Asset) -> String {
    let mut hasher = KeyHasher::new().field(&asset.resolved_target_path().unwrap_or_default());
    for filter in asset.filters() {
        hasher = hasher.field(&filter.fingerprint());
    }
    for (key, value) in asset.values() {
        hasher = hasher.field(key).field(value);
    }
    for leaf in asset.leaves() {
        let root = leaf.source_root().map(|r| r.to_string_lossy().to_string());
        let mtime = leaf
            .last_modified()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map_or(0, |d| d.as_nanos());
        hasher = hasher
            .field(&root.unwrap_or_default())
            .field(leaf.source_path().unwrap_or_default())
            .field(&mtime.to_le_bytes());
        for filter in leaf.filters() {
            hasher = hasher.field(&filter.fingerprint());
        }
    }
    hasher.finish()
}

/// An asset whose filtered content is read through a cache.
#[derive(Debug, Clone)]
pub struct CachedAsset {
    asset: Asset,
    cache: Arc<FilesystemCache>,
}

impl CachedAsset {
    pub fn new(asset: Asset, cache: Arc<FilesystemCache>) -> Self {
        Self { asset, cache }
    }

    pub fn asset(&self) -> &Asset {
        &self.asset
    }

    pub fn load(&self) -> Result<Vec<u8>, AssetError> {
        let key = cache_key(&self.asset);
        let io_err = |e: std::io::Error| AssetError::Io(self.cache.dir().join(&key), e);

        if let Some(content) = self.cache.get(&key).map_err(io_err)? {
            debug!("cache"; "hit {}", self.asset.target_path().unwrap_or("-"));
            return Ok(content);
        }
        let content = self.asset.load()?;
        self.cache.set(&key, &content).map_err(io_err)?;
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_key_tracks_source() {
        let src = TempDir::new().unwrap();
        fs::write(src.path().join("a.js"), "a").unwrap();

        let mut asset = Asset::file(src.path(), "a.js");
        asset.set_target_path(Some("app.js".into()));
        let key = cache_key(&asset);
        assert_eq!(key, cache_key(&asset));

        asset.set_target_path(Some("other.js".into()));
        assert_ne!(key, cache_key(&asset));
    }

    #[test]
    fn test_load_through_cache() {
        let src = TempDir::new().unwrap();
        let dir = TempDir::new().unwrap();
        fs::write(src.path().join("a.js"), "a").unwrap();

        let cache = Arc::new(FilesystemCache::new(dir.path()));
        let asset = Asset::file(src.path(), "a.js");
        let cached = CachedAsset::new(asset.clone(), cache.clone());

        assert_eq!(cached.load().unwrap(), b"a");
        assert!(cache.has(&cache_key(&asset)));

        // Served from the cache entry
        cache.set(&cache_key(&asset), b"cached").unwrap();
        assert_eq!(cached.load().unwrap(), b"cached");
    }
}
