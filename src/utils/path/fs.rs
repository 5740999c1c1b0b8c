//! Path normalization utilities.
//!
//! - `normalize_path` - file system paths (canonicalize + fallback)
//! - `resolve_path` - resolve relative paths against a base directory
//! - `expand_dir` - `~` expansion followed by `resolve_path`

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Resolve `path` against `base` unless it is already absolute.
///
/// The empty path resolves to `base` itself.
#[inline]
pub fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else if path.as_os_str().is_empty() {
        base.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Expand a leading `~` and resolve the result against `base`.
pub fn expand_dir(raw: &str, base: &Path) -> PathBuf {
    let expanded = shellexpand::tilde(raw);
    resolve_path(Path::new(expanded.as_ref()), base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_absolute() {
        let path = Path::new("/absolute/path/file.txt");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_normalize_path_relative() {
        let path = Path::new("relative/path/file.txt");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_resolve_path_absolute() {
        let resolved = resolve_path(Path::new("/absolute/path"), Path::new("/base"));
        assert_eq!(resolved, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_resolve_path_relative() {
        let resolved = resolve_path(Path::new("web/assets"), Path::new("/base"));
        assert_eq!(resolved, PathBuf::from("/base/web/assets"));
    }

    #[test]
    fn test_resolve_path_empty() {
        let resolved = resolve_path(Path::new(""), Path::new("/base"));
        assert_eq!(resolved, PathBuf::from("/base"));
    }

    #[test]
    fn test_expand_dir_tilde() {
        let expanded = expand_dir("~/cache", Path::new("/base"));
        assert!(expanded.is_absolute() || expanded.starts_with("~"));
        assert!(expanded.ends_with("cache"));
    }
}
