//! Assets: single files and collections of them.

use super::{AssetError, vars};
use crate::filter::{FilterContext, SharedFilter};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};

/// Where an asset's content comes from.
#[derive(Debug, Clone)]
pub enum AssetSource {
    /// A file at `root/path`.
    File { root: PathBuf, path: String },
    /// Members concatenated in order.
    Collection(Vec<Asset>),
}

/// A transformable content unit.
#[derive(Debug, Clone)]
pub struct Asset {
    source: AssetSource,
    target_path: Option<String>,
    filters: Vec<SharedFilter>,
    vars: Vec<String>,
    values: BTreeMap<String, String>,
}

impl Asset {
    pub fn file(root: impl Into<PathBuf>, path: impl Into<String>) -> Self {
        Self::new(AssetSource::File {
            root: root.into(),
            path: path.into(),
        })
    }

    pub fn collection(members: Vec<Asset>) -> Self {
        Self::new(AssetSource::Collection(members))
    }

    fn new(source: AssetSource) -> Self {
        Self {
            source,
            target_path: None,
            filters: Vec::new(),
            vars: Vec::new(),
            values: BTreeMap::new(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn source(&self) -> &AssetSource {
        &self.source
    }

    pub fn source_root(&self) -> Option<&Path> {
        match &self.source {
            AssetSource::File { root, .. } => Some(root),
            AssetSource::Collection(_) => None,
        }
    }

    pub fn source_path(&self) -> Option<&str> {
        match &self.source {
            AssetSource::File { path, .. } => Some(path),
            AssetSource::Collection(_) => None,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self.source, AssetSource::Collection(_))
    }

    /// Direct members of a collection; empty for files.
    pub fn members(&self) -> &[Asset] {
        match &self.source {
            AssetSource::Collection(members) => members,
            AssetSource::File { .. } => &[],
        }
    }

    pub fn members_mut(&mut self) -> &mut [Asset] {
        match &mut self.source {
            AssetSource::Collection(members) => members,
            AssetSource::File { .. } => &mut [],
        }
    }

    pub fn target_path(&self) -> Option<&str> {
        self.target_path.as_deref()
    }

    pub fn set_target_path(&mut self, target: Option<String>) {
        self.target_path = target;
    }

    /// Target path with `{var}` placeholders filled from the values.
    pub fn resolved_target_path(&self) -> Option<String> {
        self.target_path
            .as_deref()
            .map(|t| vars::resolve(t, &self.vars, &self.values))
    }

    pub fn filters(&self) -> &[SharedFilter] {
        &self.filters
    }

    /// Append `filter` unless one with the same name is already attached.
    pub fn ensure_filter(&mut self, filter: SharedFilter) {
        if !self.filters.iter().any(|f| f.name() == filter.name()) {
            self.filters.push(filter);
        }
    }

    pub fn vars(&self) -> &[String] {
        &self.vars
    }

    pub fn set_vars(&mut self, vars: Vec<String>) {
        self.vars = vars;
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    pub fn set_values(&mut self, values: BTreeMap<String, String>) {
        self.values = values;
    }

    // ========================================================================
    // Leaves
    // ========================================================================

    /// Flattened leaf view of the asset.
    ///
    /// A file yields itself. A collection yields clones of its files, each
    /// carrying the collection's filters after its own, and, when the
    /// collection has a target, a derived target next to it:
    /// `js/app.js` → `js/app_a_1.js`, `js/app_b_2.js`, ...
    pub fn leaves(&self) -> Vec<Asset> {
        let AssetSource::Collection(members) = &self.source else {
            return vec![self.clone()];
        };

        let mut flat = Vec::new();
        for member in members {
            flat.extend(member.leaves());
        }

        let pattern = self.target_path.as_deref().map(leaf_pattern);
        for (index, leaf) in flat.iter_mut().enumerate() {
            for filter in &self.filters {
                leaf.ensure_filter(filter.clone());
            }
            if leaf.vars.is_empty() {
                leaf.vars = self.vars.clone();
            }
            for (key, value) in &self.values {
                leaf.values.entry(key.clone()).or_insert_with(|| value.clone());
            }
            if let Some(pattern) = &pattern {
                let stem = leaf
                    .source_path()
                    .and_then(|p| Path::new(p).file_stem())
                    .and_then(|s| s.to_str())
                    .filter(|s| !s.is_empty())
                    .unwrap_or("part");
                leaf.target_path = Some(pattern.replace('*', &format!("{stem}_{}", index + 1)));
            }
        }
        flat
    }

    // ========================================================================
    // Content
    // ========================================================================

    /// Read the source and run it through the filters.
    ///
    /// Collections load each leaf and join the results with `\n`.
    pub fn load(&self) -> Result<Vec<u8>, AssetError> {
        match &self.source {
            AssetSource::File { root, path } => {
                let path = vars::resolve(path, &self.vars, &self.values);
                let full = root.join(&path);
                let content = fs::read(&full).map_err(|e| AssetError::Io(full.clone(), e))?;
                let target = self.resolved_target_path();
                let ctx = FilterContext {
                    source_root: Some(root),
                    source_path: Some(&path),
                    target_path: target.as_deref(),
                };
                let mut content = content;
                for filter in &self.filters {
                    content = filter.apply(content, &ctx)?;
                }
                Ok(content)
            }
            AssetSource::Collection(_) => {
                let mut parts = Vec::new();
                for leaf in self.leaves() {
                    parts.push(leaf.load()?);
                }
                Ok(parts.join(&b'\n'))
            }
        }
    }

    /// Latest modification time among the source files.
    pub fn last_modified(&self) -> Option<SystemTime> {
        match &self.source {
            AssetSource::File { root, path } => {
                let path = vars::resolve(path, &self.vars, &self.values);
                fs::metadata(root.join(path)).and_then(|m| m.modified()).ok()
            }
            AssetSource::Collection(members) => members.iter().filter_map(Asset::last_modified).max(),
        }
    }
}

/// `dir/name.ext` → `dir/name_*.ext`; no extension → `dir/name_*`.
fn leaf_pattern(target: &str) -> String {
    let file_start = target.rfind('/').map_or(0, |p| p + 1);
    match target[file_start..].rfind('.') {
        Some(dot) => {
            let dot = file_start + dot;
            format!("{}_*{}", &target[..dot], &target[dot..])
        }
        None => format!("{target}_*"),
    }
}
