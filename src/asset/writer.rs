//! Writes asset content under the output directory.

use super::{Asset, AssetError};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone)]
pub struct AssetWriter {
    dir: PathBuf,
}

impl AssetWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `asset` to `dir/target`, creating parent directories.
    ///
    /// Returns the written path. An asset without a target is skipped.
    pub fn write(&self, asset: &Asset) -> Result<Option<PathBuf>, AssetError> {
        let Some(target) = asset.resolved_target_path() else {
            return Ok(None);
        };
        let path = self.dir.join(target.trim_start_matches('/'));
        let content = asset.load()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| AssetError::Io(parent.to_path_buf(), e))?;
        }
        fs::write(&path, content).map_err(|e| AssetError::Io(path.clone(), e))?;
        Ok(Some(path))
    }
}
