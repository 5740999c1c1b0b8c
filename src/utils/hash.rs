//! Hashing utilities.
//!
//! - `FxHasher` for fast, non-persistent fingerprints (lock file names)
//! - `blake3` for keys that outlive the process (cache entries, generated
//!   asset names)
//!
//! # Usage
//!
//! ```ignore
//! use crate::utils::hash;
//!
//! let fp = hash::fingerprint("some content"); // -> "a1b2c3d4"
//! let key = hash::KeyHasher::new().field("root").field("app.js").finish();
//! ```

use rustc_hash::FxHasher;
use std::hash::Hasher;

/// Compute 64-bit hash from byte data.
#[inline]
pub fn compute<T: AsRef<[u8]> + ?Sized>(data: &T) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(data.as_ref());
    hasher.finish()
}

/// Compute hash and return as 8-char hex fingerprint.
#[inline]
pub fn fingerprint<T: AsRef<[u8]> + ?Sized>(value: &T) -> String {
    format!("{:016x}", compute(value))[..8].to_string()
}

/// Incremental blake3 hasher over length-delimited fields.
///
/// Each field is prefixed with its length so `("ab", "c")` and `("a", "bc")`
/// never collide.
#[derive(Default)]
pub struct KeyHasher {
    inner: blake3::Hasher,
}

impl KeyHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one field.
    pub fn field<T: AsRef<[u8]> + ?Sized>(mut self, data: &T) -> Self {
        let data = data.as_ref();
        self.inner.update(&(data.len() as u64).to_le_bytes());
        self.inner.update(data);
        self
    }

    /// Full hex digest.
    pub fn finish(&self) -> String {
        hex::encode(self.inner.finalize().as_bytes())
    }

    /// First `len` hex characters of the digest.
    pub fn short(&self, len: usize) -> String {
        let mut digest = self.finish();
        digest.truncate(len);
        digest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_shape() {
        let fp = fingerprint("/var/www/web");
        assert_eq!(fp.len(), 8);
        assert_eq!(fp, fingerprint("/var/www/web"));
        assert_ne!(fp, fingerprint("/var/www/other"));
    }

    #[test]
    fn test_key_hasher_is_delimited() {
        let a = KeyHasher::new().field("ab").field("c").finish();
        let b = KeyHasher::new().field("a").field("bc").finish();
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_key_hasher_short() {
        let hasher = KeyHasher::new().field("js/*.js");
        assert_eq!(hasher.short(7).len(), 7);
        assert!(hasher.finish().starts_with(&hasher.short(7)));
    }
}
