//! Template resource discovery.

use jwalk::WalkDir;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

/// A template file found under a namespace search path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateResource {
    /// Logical name: `@namespace/relative/path.twig`.
    pub name: String,
    pub path: PathBuf,
}

/// Walk every namespace's search paths for files ending in `.{extension}`.
///
/// Results are sorted by logical name. Missing directories are skipped.
pub fn discover(paths: &BTreeMap<String, Vec<PathBuf>>, extension: &str) -> Vec<TemplateResource> {
    let suffix = format!(".{}", extension.trim_start_matches('.'));
    let mut found = Vec::new();

    for (namespace, dirs) in paths {
        for dir in dirs.iter().filter(|d| d.is_dir()) {
            found.extend(
                WalkDir::new(dir)
                    .into_iter()
                    .filter_map(Result::ok)
                    .filter(|e| e.file_type().is_file())
                    .filter(|e| e.file_name().to_string_lossy().ends_with(&suffix))
                    .filter_map(|e| resource(namespace, dir, e.path())),
            );
        }
    }

    found.sort_by(|a, b| a.name.cmp(&b.name));
    found
}

fn resource(namespace: &str, dir: &Path, path: PathBuf) -> Option<TemplateResource> {
    let rel = path.strip_prefix(dir).ok()?;
    let rel = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    Some(TemplateResource {
        name: format!("@{namespace}/{rel}"),
        path,
    })
}
