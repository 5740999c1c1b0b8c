//! Workers: post-creation hooks run by the asset factory.

use super::Asset;
use std::fmt;

/// Adjusts an asset after the factory has built it.
pub trait Worker: Send + Sync + fmt::Debug {
    fn process(&self, asset: &mut Asset);
}

/// Prepends the URL prefix to target paths.
///
/// Idempotent: a target already under the prefix is left alone, so running
/// the worker on a collection and then on its members never doubles it.
#[derive(Debug, Clone)]
pub struct PrefixWorker {
    prefix: String,
}

impl PrefixWorker {
    /// Normalise `prefix` to `/segment/.../`; empty becomes `/`.
    pub fn new(prefix: &str) -> Self {
        let trimmed = prefix.trim().trim_matches('/');
        let prefix = if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{trimmed}/")
        };
        Self { prefix }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Worker for PrefixWorker {
    fn process(&self, asset: &mut Asset) {
        let Some(target) = asset.target_path() else {
            return;
        };
        if target.starts_with(&self.prefix) {
            return;
        }
        let prefixed = format!("{}{}", self.prefix, target.trim_start_matches('/'));
        asset.set_target_path(Some(prefixed));
    }
}
