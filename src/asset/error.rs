//! Asset error types.

use crate::filter::FilterError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    /// An `@name` reference or manager lookup found nothing.
    #[error("There is no \"{0}\" asset.")]
    UnknownAsset(String),

    /// An `@name` reference leads back to itself.
    #[error("Asset \"{0}\" references itself")]
    Circular(String),

    /// Inputs such as `http://...` that cannot be read from disk.
    #[error("Unsupported input `{0}`")]
    UnsupportedInput(String),

    #[error("IO error on `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error(transparent)]
    Filter(#[from] FilterError),
}
