//! MIME type lookup by file extension.
//!
//! The built-in table lists `(mime, extension)` pairs. [`MimeTable`] flips it
//! once into an extension index; callers build one table at startup and pass
//! it around instead of reaching for a global.

use rustc_hash::FxHashMap;
use std::path::Path;

/// Fallback for responses whose extension is not in the table.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Built-in `(mime, extension)` pairs.
///
/// When two entries share an extension the later one wins, so the preferred
/// type for an extension is listed last.
const MIME_EXTENSIONS: &[(&str, &str)] = &[
    // Text
    ("text/html", "html"),
    ("text/html", "htm"),
    ("text/plain", "txt"),
    ("text/plain", "map"),
    ("text/css", "css"),
    ("application/javascript", "js"),
    ("application/javascript", "mjs"),
    ("text/javascript", "cjs"),
    ("application/json", "json"),
    ("application/xml", "xml"),
    ("text/markdown", "md"),
    ("text/yaml", "yaml"),
    ("text/yaml", "yml"),
    ("text/csv", "csv"),
    ("text/x-handlebars-template", "hbs"),
    ("text/x-handlebars-template", "handlebars"),
    // Sources served before compilation
    ("text/x-scss", "scss"),
    ("text/x-sass", "sass"),
    ("text/x-less", "less"),
    ("text/x-stylus", "styl"),
    ("text/coffeescript", "coffee"),
    ("application/typescript", "ts"),
    ("application/dart", "dart"),
    ("text/jsx", "jsx"),
    // Web feeds
    ("application/rss+xml", "rss"),
    ("application/atom+xml", "atom"),
    // Documents / binary
    ("application/pdf", "pdf"),
    ("application/wasm", "wasm"),
    ("application/zip", "zip"),
    ("application/gzip", "gz"),
    // Images
    ("image/png", "png"),
    ("image/jpeg", "jpeg"),
    ("image/jpeg", "jpg"),
    ("image/jpeg", "jpe"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
    ("image/avif", "avif"),
    ("image/svg+xml", "svg"),
    ("image/svg+xml", "svgz"),
    ("image/x-icon", "ico"),
    ("image/bmp", "bmp"),
    ("image/tiff", "tif"),
    ("image/tiff", "tiff"),
    // Audio
    ("audio/mpeg", "mp3"),
    ("audio/wav", "wav"),
    ("audio/ogg", "oga"),
    ("audio/ogg", "ogg"),
    ("audio/flac", "flac"),
    ("audio/aac", "aac"),
    // Video
    ("video/mp4", "mp4"),
    ("video/mp4", "m4v"),
    ("video/webm", "webm"),
    ("video/ogg", "ogv"),
    ("video/quicktime", "mov"),
    // Fonts
    ("font/woff", "woff"),
    ("font/woff2", "woff2"),
    ("font/ttf", "ttf"),
    ("font/otf", "otf"),
    ("application/vnd.ms-fontobject", "eot"),
];

/// Immutable extension → MIME index.
#[derive(Debug, Clone)]
pub struct MimeTable {
    by_extension: FxHashMap<&'static str, &'static str>,
}

impl MimeTable {
    /// Build the index from the built-in table.
    pub fn new() -> Self {
        let by_extension = MIME_EXTENSIONS
            .iter()
            .map(|&(mime, ext)| (ext, mime))
            .collect();
        Self { by_extension }
    }

    /// Guess the MIME type of `path` from its extension.
    ///
    /// Returns `None` when the path has no extension or the extension is
    /// unknown. Lookup is case-sensitive, like the extension itself.
    pub fn guess(&self, path: impl AsRef<Path>) -> Option<&'static str> {
        let ext = path.as_ref().extension()?.to_str()?;
        self.by_extension.get(ext).copied()
    }

    /// Guess, falling back to `application/octet-stream`.
    pub fn content_type(&self, path: impl AsRef<Path>) -> &'static str {
        self.guess(path).unwrap_or(OCTET_STREAM)
    }

    /// Number of known extensions.
    pub fn len(&self) -> usize {
        self.by_extension.len()
    }
}

impl Default for MimeTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if the MIME type represents text content.
pub fn is_text(mime: &str) -> bool {
    mime.starts_with("text/")
        || mime == "application/javascript"
        || mime == "application/json"
        || mime == "application/xml"
}
