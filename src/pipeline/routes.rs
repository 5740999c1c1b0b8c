//! Routes registered by non-writing dumps.

use crate::{
    asset::{Asset, AssetError},
    cache::CachedAsset,
};
use rustc_hash::FxHashMap;

/// What a route serves.
#[derive(Debug, Clone)]
pub enum RouteContent {
    Plain(Asset),
    Cached(CachedAsset),
}

impl RouteContent {
    pub fn asset(&self) -> &Asset {
        match self {
            Self::Plain(asset) => asset,
            Self::Cached(cached) => cached.asset(),
        }
    }

    pub fn load(&self) -> Result<Vec<u8>, AssetError> {
        match self {
            Self::Plain(asset) => asset.load(),
            Self::Cached(cached) => cached.load(),
        }
    }
}

/// URL path → content.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: FxHashMap<String, RouteContent>,
}

impl RouteTable {
    /// Register `content` at `/target`; a later registration replaces.
    pub fn insert(&mut self, target: &str, content: RouteContent) -> String {
        let path = format!("/{}", target.trim_start_matches('/'));
        self.routes.insert(path.clone(), content);
        path
    }

    pub fn get(&self, path: &str) -> Option<&RouteContent> {
        self.routes.get(path)
    }

    /// Registered paths, sorted.
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<_> = self.routes.keys().cloned().collect();
        paths.sort();
        paths
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn clear(&mut self) {
        self.routes.clear();
    }
}
