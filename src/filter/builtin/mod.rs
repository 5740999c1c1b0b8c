//! Filters implemented in-process.

pub mod css;
pub mod minify;
