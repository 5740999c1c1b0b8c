//! Shared utilities: process execution, hashing, locking, MIME lookup and
//! path helpers.

pub mod exec;
pub mod hash;
pub mod lock;
pub mod mime;
pub mod path;
