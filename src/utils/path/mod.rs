//! Path utilities.
//!
//! Pure functions for path manipulation.
//!
//! - [`fs`]: Filesystem path normalization (`normalize_path`, `resolve_path`,
//!   `expand_dir`)

pub mod fs;

pub use fs::{expand_dir, normalize_path};
