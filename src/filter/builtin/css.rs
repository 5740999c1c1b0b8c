//! CSS `url(...)` transformations: relative path rewriting (`cssrewrite`)
//! and version query appending (`csscachebusting`).

use regex::{Captures, Regex};
use std::sync::OnceLock;

/// `url(...)` with optional quotes; exactly one of the three groups matches.
fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"url\(\s*(?:"([^"]*)"|'([^']*)'|([^'")\s]*))\s*\)"#).unwrap())
}

/// Apply `map` to every url reference, keeping the surrounding syntax.
fn replace_urls(css: &str, map: impl Fn(&str) -> Option<String>) -> String {
    url_regex().replace_all(css, |caps: &Captures| {
        let whole = &caps[0];
        let Some(url) = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)) else {
            return whole.to_string();
        };
        match map(url.as_str()) {
            Some(new_url) => {
                let start = url.start() - caps.get(0).map_or(0, |m| m.start());
                format!("{}{}{}", &whole[..start], new_url, &whole[start + url.len()..])
            }
            None => whole.to_string(),
        }
    })
    .into_owned()
}

fn is_external(url: &str) -> bool {
    url.is_empty()
        || url.contains("://")
        || url.starts_with("//")
        || url.starts_with("data:")
        || url.starts_with('#')
}

// ============================================================================
// cssrewrite
// ============================================================================

/// Rewrite relative urls so they still resolve after the stylesheet moves
/// from `source_path` to `target_path`.
///
/// Both paths are relative to their roots; absolute and external urls are
/// left alone.
pub fn rewrite_urls(css: &str, source_path: &str, target_path: &str) -> String {
    if source_path == target_path {
        return css.to_string();
    }
    let base = relative_base(source_path, target_path.trim_start_matches('/'));

    replace_urls(css, |url| {
        if is_external(url) || url.starts_with('/') {
            return None;
        }
        let mut base = base.as_str();
        let mut url = url;
        // Climb out of the base first while both sides allow it
        while let Some(rest) = url.strip_prefix("../")
            && base.matches('/').count() >= 2
        {
            let trimmed = base.trim_end_matches('/');
            base = trimmed.rfind('/').map_or("", |pos| &trimmed[..=pos]);
            url = rest;
        }
        Some(collapse(&format!("{base}{url}")))
    })
}

/// Path from the target's directory back to the source's directory, with a
/// trailing `/` when non-empty.
fn relative_base(source_path: &str, target_path: &str) -> String {
    let source_dir = parent(source_path);
    let mut target_dir = parent(target_path);
    let mut path = String::new();

    while !source_dir.starts_with(target_dir) {
        path.push_str("../");
        match target_dir.rfind('/') {
            Some(pos) => target_dir = &target_dir[..pos],
            None => {
                target_dir = "";
                break;
            }
        }
    }

    let source = format!("{source_dir}/");
    path.push_str(source[target_dir.len()..].trim_start_matches('/'));
    path
}

fn parent(path: &str) -> &str {
    path.rfind('/').map_or("", |pos| &path[..pos])
}

/// Resolve `..` segments that follow a named segment.
fn collapse(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        if part == ".." && parts.last().is_some_and(|last| *last != "..") {
            parts.pop();
        } else {
            parts.push(part);
        }
    }
    parts.join("/")
}

// ============================================================================
// csscachebusting
// ============================================================================

/// Append `version` to every non-data url using `format`, where the first
/// `%s` is the url and the second the version.
pub fn bust_urls(css: &str, version: &str, format: &str) -> String {
    replace_urls(css, |url| {
        if url.is_empty() || url.starts_with("data:") {
            return None;
        }
        Some(format.replacen("%s", url, 1).replacen("%s", version, 1))
    })
}
