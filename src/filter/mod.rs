//! Content filters.
//!
//! ```text
//! filter/
//! ├── kind        # FilterKind: closed set of filter names
//! ├── table       # Declarative registry (params, settings, runtime)
//! ├── option      # Option lookup with defaults
//! ├── factory     # name + options → ConfiguredFilter
//! ├── configured  # ConfiguredFilter: runs the transformation
//! ├── builtin/    # In-process transformations (minify, css urls)
//! └── manager     # Named filters available to formulas
//! ```

pub mod builtin;
mod configured;
mod error;
mod factory;
mod kind;
mod manager;
pub mod option;
pub mod table;

pub use configured::ConfiguredFilter;
pub use error::FilterError;
pub use factory::FilterFactory;
pub use kind::FilterKind;
pub use manager::FilterManager;

use std::{fmt, path::Path, sync::Arc};

/// What a filter may know about the asset it transforms.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterContext<'a> {
    pub source_root: Option<&'a Path>,
    /// Source path relative to `source_root`.
    pub source_path: Option<&'a str>,
    /// Target path the content will be written or served at.
    pub target_path: Option<&'a str>,
}

/// A content transformation step.
pub trait Filter: Send + Sync + fmt::Debug {
    /// Name the filter was registered under.
    fn name(&self) -> &str;

    /// Transform `content`.
    fn apply(&self, content: Vec<u8>, ctx: &FilterContext<'_>) -> Result<Vec<u8>, FilterError>;

    /// Stable digest of the filter's configuration, used in cache keys.
    fn fingerprint(&self) -> String;
}

pub type SharedFilter = Arc<dyn Filter>;
