//! Filtered-content cache.
//!
//! Entries are keyed by everything that affects an asset's output: source
//! roots and paths, their modification times, the filter fingerprints, the
//! target path and var values. A changed source therefore misses rather than
//! invalidates.

mod cached;
mod filesystem;

pub use cached::CachedAsset;
pub use filesystem::FilesystemCache;
