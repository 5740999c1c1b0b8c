//! Formula → asset.

use super::{Asset, AssetError, DEFAULT_OUTPUT, Formula, Worker};
use crate::filter::FilterManager;
use jwalk::WalkDir;
use regex::Regex;
use std::{
    collections::BTreeSet,
    path::{Component, Path, PathBuf},
    sync::Arc,
};

/// Builds assets from formulas.
#[derive(Debug)]
pub struct AssetFactory {
    root: PathBuf,
    debug: bool,
    filters: Arc<FilterManager>,
    workers: Vec<Box<dyn Worker>>,
}

impl AssetFactory {
    pub fn new(root: impl Into<PathBuf>, filters: Arc<FilterManager>, debug: bool) -> Self {
        Self {
            root: root.into(),
            debug,
            filters,
            workers: Vec::new(),
        }
    }

    pub fn add_worker(&mut self, worker: Box<dyn Worker>) {
        self.workers.push(worker);
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    pub fn filter_manager(&self) -> &FilterManager {
        &self.filters
    }

    /// Create the asset described by `formula`.
    ///
    /// `reference` resolves `@name` inputs to other assets. The result is
    /// always a collection, even for a single input.
    pub fn create(
        &self,
        formula: &Formula,
        reference: &mut dyn FnMut(&str) -> Result<Asset, AssetError>,
    ) -> Result<Asset, AssetError> {
        let mut members = Vec::new();
        let mut extensions = BTreeSet::new();

        for input in &formula.inputs {
            if let Some(name) = input.strip_prefix('@') {
                members.push(reference(name)?);
                continue;
            }
            if input.contains("://") {
                return Err(AssetError::UnsupportedInput(input.clone()));
            }
            extensions.insert(extension_of(input).unwrap_or_default().to_string());
            if input.contains('*') {
                members.extend(self.expand_glob(input));
            } else {
                members.push(self.file_asset(input));
            }
        }

        let mut asset = Asset::collection(members);

        let debug = formula.options.debug.unwrap_or(self.debug);
        for name in &formula.filters {
            let name = match name.strip_prefix('?') {
                Some(_) if debug => continue,
                Some(optional) => optional,
                None => name.as_str(),
            };
            asset.ensure_filter(self.filters.get(name)?);
        }

        let name = formula
            .options
            .name
            .clone()
            .unwrap_or_else(|| formula.generated_name());
        let mut output = formula
            .options
            .output
            .clone()
            .unwrap_or_else(|| DEFAULT_OUTPUT.to_string());
        if extension_of(&output).is_none()
            && extensions.len() == 1
            && let Some(ext) = extensions.first().filter(|e| !e.is_empty())
        {
            output = format!("{output}.{ext}");
        }
        asset.set_target_path(Some(output.replace('*', &name)));
        asset.set_vars(formula.options.vars.clone());

        self.apply_workers(&mut asset);
        Ok(asset)
    }

    fn apply_workers(&self, asset: &mut Asset) {
        for worker in &self.workers {
            for member in asset.members_mut() {
                worker.process(member);
            }
            worker.process(asset);
        }
    }

    /// A single file input, absolute or relative to the root.
    fn file_asset(&self, input: &str) -> Asset {
        let path = Path::new(input);
        if !path.is_absolute() {
            return Asset::file(&self.root, input);
        }
        if let Ok(rel) = path.strip_prefix(&self.root) {
            return Asset::file(&self.root, rel.to_string_lossy());
        }
        let parent = path.parent().unwrap_or_else(|| Path::new("/"));
        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        Asset::file(parent, name)
    }

    /// Expand a `*` / `**` pattern into file assets, sorted by path.
    fn expand_glob(&self, pattern: &str) -> Vec<Asset> {
        let full = if Path::new(pattern).is_absolute() {
            PathBuf::from(pattern)
        } else {
            self.root.join(pattern)
        };
        let base = static_base(&full);
        let Some(matcher) = glob_regex(&full.to_string_lossy()) else {
            return Vec::new();
        };

        let mut files: Vec<PathBuf> = WalkDir::new(&base)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path())
            .filter(|p| matcher.is_match(&p.to_string_lossy()))
            .collect();
        files.sort();

        files
            .into_iter()
            .map(|file| match file.strip_prefix(&self.root) {
                Ok(rel) => Asset::file(&self.root, rel.to_string_lossy()),
                Err(_) => self.file_asset(&file.to_string_lossy()),
            })
            .collect()
    }
}

/// Extension of the last path segment, if any.
fn extension_of(path: &str) -> Option<&str> {
    let file = path.rsplit('/').next().unwrap_or(path);
    file.rfind('.').map(|dot| &file[dot + 1..]).filter(|e| !e.is_empty())
}

/// Longest leading directory without wildcards.
fn static_base(pattern: &Path) -> PathBuf {
    let mut base = PathBuf::new();
    for component in pattern.components() {
        if let Component::Normal(part) = component
            && part.to_string_lossy().contains('*')
        {
            break;
        }
        base.push(component);
    }
    base
}

/// `*` matches within a segment, `**` across segments.
fn glob_regex(pattern: &str) -> Option<Regex> {
    let mut re = String::from("^");
    let mut rest = pattern;
    while let Some(pos) = rest.find('*') {
        re.push_str(&regex::escape(&rest[..pos]));
        rest = &rest[pos..];
        if rest.starts_with("**") {
            re.push_str(".*");
            rest = &rest[2..];
        } else {
            re.push_str("[^/]*");
            rest = &rest[1..];
        }
    }
    re.push_str(&regex::escape(rest));
    re.push('$');
    Regex::new(&re).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::PrefixWorker;
    use crate::filter::FilterFactory;
    use serde_json::{Map, Value, json};
    use std::fs;
    use tempfile::TempDir;

    fn filters() -> Arc<FilterManager> {
        let factory = FilterFactory::with_binaries("java", "node", "ruby", &[], None);
        let entries: Map<String, Value> =
            serde_json::from_value(json!({ "cssrewrite": {}, "uglifyjs2": {} })).unwrap();
        Arc::new(FilterManager::from_config(&factory, &entries).unwrap())
    }

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("js/vendor")).unwrap();
        fs::write(dir.path().join("js/a.js"), "a").unwrap();
        fs::write(dir.path().join("js/b.js"), "b").unwrap();
        fs::write(dir.path().join("js/vendor/c.js"), "c").unwrap();
        fs::write(dir.path().join("js/readme.txt"), "x").unwrap();
        dir
    }

    fn no_refs(name: &str) -> Result<Asset, AssetError> {
        Err(AssetError::UnknownAsset(name.to_string()))
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("js/app.js"), Some("js"));
        assert_eq!(extension_of("js.d/app"), None);
        assert_eq!(extension_of("*"), None);
    }

    #[test]
    fn test_glob_regex() {
        let re = glob_regex("/src/js/*.js").unwrap();
        assert!(re.is_match("/src/js/a.js"));
        assert!(!re.is_match("/src/js/vendor/c.js"));

        let re = glob_regex("/src/js/**.js").unwrap();
        assert!(re.is_match("/src/js/vendor/c.js"));
    }

    #[test]
    fn test_static_base() {
        assert_eq!(static_base(Path::new("/src/js/*.js")), PathBuf::from("/src/js"));
        assert_eq!(static_base(Path::new("/src/**/x.js")), PathBuf::from("/src"));
    }

    #[test]
    fn test_create_with_output() {
        let dir = fixture();
        let factory = AssetFactory::new(dir.path(), filters(), false);
        let formula = Formula::new(vec!["js/a.js".into(), "js/b.js".into()], vec!["uglifyjs2".into()])
            .with_output("static/app.js");

        let asset = factory.create(&formula, &mut no_refs).unwrap();
        assert!(asset.is_collection());
        assert_eq!(asset.members().len(), 2);
        assert_eq!(asset.target_path(), Some("static/app.js"));
        assert_eq!(asset.filters().len(), 1);
    }

    #[test]
    fn test_glob_input() {
        let dir = fixture();
        let factory = AssetFactory::new(dir.path(), filters(), false);
        let formula = Formula::new(vec!["js/*.js".into()], vec![]);
        let asset = factory.create(&formula, &mut no_refs).unwrap();
        let paths: Vec<_> = asset.members().iter().filter_map(Asset::source_path).collect();
        assert_eq!(paths, ["js/a.js", "js/b.js"]);
    }

    #[test]
    fn test_optional_filter_skipped_in_debug() {
        let dir = fixture();
        let formula = Formula::new(vec!["js/a.js".into()], vec!["?uglifyjs2".into()]);

        let debug = AssetFactory::new(dir.path(), filters(), true);
        assert!(debug.create(&formula, &mut no_refs).unwrap().filters().is_empty());

        let prod = AssetFactory::new(dir.path(), filters(), false);
        assert_eq!(prod.create(&formula, &mut no_refs).unwrap().filters().len(), 1);

        // The formula's own flag wins over the factory's
        let formula = formula.with_debug(true);
        assert!(prod.create(&formula, &mut no_refs).unwrap().filters().is_empty());
    }

    #[test]
    fn test_unknown_filter() {
        let dir = fixture();
        let factory = AssetFactory::new(dir.path(), filters(), false);
        let formula = Formula::new(vec!["js/a.js".into()], vec!["less".into()]);
        let err = factory.create(&formula, &mut no_refs).unwrap_err();
        assert!(matches!(err, AssetError::Filter(_)));
    }

    #[test]
    fn test_generated_name_and_extension() {
        let dir = fixture();
        let factory = AssetFactory::new(dir.path(), filters(), false);
        let formula = Formula::new(vec!["js/a.js".into(), "js/b.js".into()], vec![]);
        let asset = factory.create(&formula, &mut no_refs).unwrap();

        let name = formula.generated_name();
        assert_eq!(name.len(), 7);
        assert_eq!(asset.target_path(), Some(format!("{name}.js").as_str()));

        // Mixed extensions: no consensus
        let formula = Formula::new(vec!["js/a.js".into(), "js/readme.txt".into()], vec![]).with_output("out/*");
        let asset = factory.create(&formula, &mut no_refs).unwrap();
        assert!(!asset.target_path().unwrap().contains('.'));
    }

    #[test]
    fn test_reference_input() {
        let dir = fixture();
        let factory = AssetFactory::new(dir.path(), filters(), false);
        let formula = Formula::new(vec!["@jquery".into(), "js/a.js".into()], vec![]);
        let mut seen = Vec::new();
        let asset = factory
            .create(&formula, &mut |name| {
                seen.push(name.to_string());
                Ok(Asset::file(dir.path(), "js/b.js"))
            })
            .unwrap();
        assert_eq!(seen, ["jquery"]);
        assert_eq!(asset.members().len(), 2);

        let err = factory.create(&formula, &mut no_refs).unwrap_err();
        assert!(matches!(err, AssetError::UnknownAsset(ref n) if n == "jquery"));
    }

    #[test]
    fn test_absolute_input_outside_root() {
        let dir = fixture();
        let other = TempDir::new().unwrap();
        fs::write(other.path().join("x.js"), "x").unwrap();
        let factory = AssetFactory::new(dir.path(), filters(), false);

        let abs = other.path().join("x.js").to_string_lossy().to_string();
        let asset = factory.file_asset(&abs);
        assert_eq!(asset.source_root(), Some(other.path()));
        assert_eq!(asset.source_path(), Some("x.js"));

        let inside = dir.path().join("js/a.js").to_string_lossy().to_string();
        assert_eq!(factory.file_asset(&inside).source_path(), Some("js/a.js"));
    }

    #[test]
    fn test_remote_input_rejected() {
        let dir = fixture();
        let factory = AssetFactory::new(dir.path(), filters(), false);
        let formula = Formula::new(vec!["https://cdn.example.com/x.js".into()], vec![]);
        assert!(matches!(
            factory.create(&formula, &mut no_refs),
            Err(AssetError::UnsupportedInput(_))
        ));
    }

    #[test]
    fn test_workers_applied() {
        let dir = fixture();
        let mut factory = AssetFactory::new(dir.path(), filters(), false);
        factory.add_worker(Box::new(PrefixWorker::new("static")));
        let formula = Formula::new(vec!["js/a.js".into()], vec![]).with_output("app.js");
        let asset = factory.create(&formula, &mut no_refs).unwrap();
        assert_eq!(asset.target_path(), Some("/static/app.js"));
    }
}
