//! URL to route and filesystem path resolution.

use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};

/// Route key for a request URL: decoded, query stripped, one leading `/`.
pub fn route_path(url: &str) -> String {
    format!("/{}", normalize_url(url))
}

/// Resolve URL to a file under `serve_root`, rejecting escapes.
pub fn resolve_path(url: &str, serve_root: &Path) -> Option<PathBuf> {
    let clean = normalize_url(url);

    if clean.contains("..") {
        return None;
    }

    let local = serve_root.join(&clean);

    // Canonicalize to resolve symlinks and verify path is under serve_root
    let canonical = local.canonicalize().ok()?;
    let root_canonical = serve_root.canonicalize().ok()?;

    if !canonical.starts_with(&root_canonical) {
        return None;
    }

    canonical.is_file().then_some(canonical)
}

/// Normalize URL: decode, strip query string, trim slashes
fn normalize_url(url: &str) -> String {
    let decoded = percent_decode_str(url)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default();

    let path = decoded.split('?').next().unwrap_or(&decoded);
    path.trim_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_route_path() {
        assert_eq!(route_path("/static/app.js?v=3"), "/static/app.js");
        assert_eq!(route_path("/static/my%20app.js"), "/static/my app.js");
        assert_eq!(route_path("static/app.js"), "/static/app.js");
    }

    #[test]
    fn test_resolve_path() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("static")).unwrap();
        fs::write(dir.path().join("static/app.js"), "").unwrap();

        let resolved = resolve_path("/static/app.js", dir.path()).unwrap();
        assert!(resolved.ends_with("static/app.js"));
        assert!(resolve_path("/static", dir.path()).is_none());
        assert!(resolve_path("/static/missing.js", dir.path()).is_none());
        assert!(resolve_path("/../etc/passwd", dir.path()).is_none());
    }
}
