//! Generic filter builder driven by the registry table.

use super::{
    ConfiguredFilter, FilterError, FilterKind,
    option::{self, Fallback},
    table::{self, DefaultValue, Setting},
};
use serde_json::{Map, Value, json};
use std::path::Path;

/// Params that name a program and therefore must be strings.
const PROGRAM_PARAMS: &[&str] = &["bin", "jar", "java"];
/// Interpreter params: a string, or `null` to run the program directly.
const INTERPRETER_PARAMS: &[&str] = &["node", "ruby"];

/// Builds configured filters from `(name, options)` entries.
///
/// Holds the pipeline-wide values (`java`, `node`, `ruby`, `node_paths`,
/// `cache_dir`) that individual filters fall back to.
#[derive(Debug, Clone)]
pub struct FilterFactory {
    shared: Map<String, Value>,
}

impl FilterFactory {
    /// Create a factory over shared values.
    ///
    /// `node_paths` defaults to `[]` and `cache_dir` to the system temporary
    /// directory; the binaries have no default here.
    pub fn new(mut shared: Map<String, Value>) -> Self {
        shared.entry("node_paths").or_insert_with(|| json!([]));
        shared
            .entry("cache_dir")
            .or_insert_with(|| json!(std::env::temp_dir().to_string_lossy()));
        Self { shared }
    }

    /// Factory with the standard interpreter locations.
    pub fn with_binaries(java: &str, node: &str, ruby: &str, node_paths: &[String], cache_dir: Option<&Path>) -> Self {
        let mut shared = Map::new();
        shared.insert("java".into(), json!(java));
        shared.insert("node".into(), json!(node));
        shared.insert("ruby".into(), json!(ruby));
        shared.insert("node_paths".into(), json!(node_paths));
        if let Some(dir) = cache_dir {
            shared.insert("cache_dir".into(), json!(dir.to_string_lossy()));
        }
        Self::new(shared)
    }

    /// Resolve `name` with `options` into a configured filter.
    ///
    /// One leading `_` is ignored when looking up the kind. A non-object
    /// `options` value counts as an empty mapping. No process is spawned.
    pub fn resolve(&self, name: &str, options: &Value) -> Result<ConfiguredFilter, FilterError> {
        let kind =
            FilterKind::from_name(name).ok_or_else(|| FilterError::UnknownFilter(name.to_string()))?;
        let spec = table::lookup(kind);
        let options = option::as_options(options);

        let params = self.read_all(spec.params, &options)?;
        for (key, value) in &params {
            check_param(name, key, value)?;
        }
        let settings = self.read_all(spec.settings, &options)?;

        Ok(ConfiguredFilter::new(name, spec, params, settings))
    }

    fn read_all(
        &self,
        settings: &'static [Setting],
        options: &Map<String, Value>,
    ) -> Result<Vec<(&'static str, Value)>, FilterError> {
        settings
            .iter()
            .map(|setting| {
                // Shared values are only consulted when the filter has no own value
                let fallback = if options.contains_key(setting.key) {
                    Fallback::Required
                } else {
                    self.fallback(setting.default)?
                };
                Ok((setting.field, option::get(options, setting.key, fallback)?))
            })
            .collect()
    }

    fn fallback(&self, default: DefaultValue) -> Result<Fallback, FilterError> {
        Ok(match default {
            DefaultValue::Required => Fallback::Required,
            DefaultValue::Null => Fallback::Value(Value::Null),
            DefaultValue::Bool(b) => Fallback::Value(Value::Bool(b)),
            DefaultValue::Str(s) => Fallback::Value(json!(s)),
            DefaultValue::EmptyList => Fallback::Value(json!([])),
            DefaultValue::Shared(shared) => {
                Fallback::Value(option::get(&self.shared, shared.key(), Fallback::Required)?)
            }
        })
    }
}

fn check_param(filter: &str, key: &str, value: &Value) -> Result<(), FilterError> {
    let ok = if PROGRAM_PARAMS.contains(&key) {
        value.is_string()
    } else if INTERPRETER_PARAMS.contains(&key) {
        value.is_string() || value.is_null()
    } else {
        true
    };
    if ok {
        Ok(())
    } else {
        Err(FilterError::InvalidOption {
            filter: filter.to_string(),
            key: key.to_string(),
            expected: "a string path",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Filter;

    fn factory() -> FilterFactory {
        FilterFactory::with_binaries(
            "/usr/bin/java",
            "/usr/bin/node",
            "/usr/bin/ruby",
            &["/opt/node_modules".to_string()],
            Some(Path::new("/var/cache/assets")),
        )
    }

    #[test]
    fn test_unknown_filter() {
        let err = factory().resolve("nope", &json!({})).unwrap_err();
        assert!(matches!(err, FilterError::UnknownFilter(ref n) if n == "nope"));
        assert_eq!(err.to_string(), "There is no \"nope\" filter.");
    }

    #[test]
    fn test_every_kind_resolves() {
        let factory = factory();
        for kind in FilterKind::ALL {
            let options = json!({ "jar": "/opt/tool.jar" });
            let filter = factory.resolve(kind.name(), &options).unwrap();
            assert_eq!(filter.kind(), kind);
        }
    }

    #[test]
    fn test_sass_defaults() {
        let filter = factory().resolve("sass", &json!({})).unwrap();
        assert_eq!(filter.param("bin"), Some(&json!("/usr/bin/sass")));
        assert_eq!(filter.param("ruby"), Some(&json!("/usr/bin/ruby")));
        assert_eq!(filter.setting("cache_location"), Some(&json!("/var/cache/assets")));
        assert_eq!(filter.setting("load_paths"), Some(&json!([])));
        assert_eq!(filter.setting("style"), Some(&Value::Null));
    }

    #[test]
    fn test_overrides_win() {
        let filter = factory()
            .resolve("sass", &json!({ "bin": "/opt/sass", "style": "compressed", "enable_sourcemaps": true }))
            .unwrap();
        assert_eq!(filter.param("bin"), Some(&json!("/opt/sass")));
        assert_eq!(filter.setting("style"), Some(&json!("compressed")));
        // Stored under its setter name
        assert_eq!(filter.setting("source_map"), Some(&json!(true)));
        assert_eq!(filter.setting("enable_sourcemaps"), None);
    }

    #[test]
    fn test_leading_underscore() {
        let filter = factory().resolve("_scss", &json!({})).unwrap();
        assert_eq!(filter.kind(), FilterKind::Scss);
        assert_eq!(filter.name(), "_scss");
    }

    #[test]
    fn test_non_object_options_are_empty() {
        let filter = factory().resolve("cssembed", &json!({ "jar": "/opt/cssembed.jar" })).unwrap();
        assert_eq!(filter.setting("charset"), Some(&json!("utf8")));

        let filter = factory().resolve("csscachebusting", &json!("garbage")).unwrap();
        assert_eq!(filter.setting("format"), Some(&json!("%s?%s")));
        assert_eq!(filter.setting("version"), Some(&Value::Null));
    }

    #[test]
    fn test_jar_required() {
        for name in ["closure_jar", "cssembed", "gss", "yui_css", "yui_js"] {
            let err = factory().resolve(name, &json!({})).unwrap_err();
            assert!(
                matches!(err, FilterError::MissingOption { ref key } if key == "jar"),
                "{name}"
            );
        }
    }

    #[test]
    fn test_shared_defaults() {
        let filter = factory().resolve("uglifyjs2", &json!({})).unwrap();
        assert_eq!(filter.param("node"), Some(&json!("/usr/bin/node")));
        assert_eq!(filter.setting("node_paths"), Some(&json!(["/opt/node_modules"])));

        let filter = factory().resolve("yui_js", &json!({ "jar": "/opt/yui.jar" })).unwrap();
        assert_eq!(filter.param("java"), Some(&json!("/usr/bin/java")));
    }

    #[test]
    fn test_cache_dir_defaults_to_temp() {
        let factory = FilterFactory::with_binaries("java", "node", "ruby", &[], None);
        let filter = factory.resolve("scss", &json!({})).unwrap();
        let expected = std::env::temp_dir().to_string_lossy().to_string();
        assert_eq!(filter.setting("cache_location"), Some(&json!(expected)));
    }

    #[test]
    fn test_missing_shared_binary() {
        let factory = FilterFactory::new(Map::new());
        let err = factory.resolve("coffee", &json!({})).unwrap_err();
        assert!(matches!(err, FilterError::MissingOption { ref key } if key == "node"));

        // An explicit value means the shared one is never consulted
        assert!(factory.resolve("coffee", &json!({ "node": "/opt/node" })).is_ok());
    }

    #[test]
    fn test_invalid_bin_type() {
        let err = factory().resolve("sass", &json!({ "bin": 42 })).unwrap_err();
        assert!(matches!(err, FilterError::InvalidOption { ref key, .. } if key == "bin"));

        // A null interpreter runs the program directly
        assert!(factory().resolve("sass", &json!({ "ruby": null })).is_ok());
    }

    #[test]
    fn test_settings_keep_table_order() {
        let filter = factory().resolve("cleancss", &json!({})).unwrap();
        let fields: Vec<_> = filter.settings().iter().map(|(f, _)| *f).collect();
        assert_eq!(fields[0], "node_paths");
        assert_eq!(fields[4], "semantic_merging");
        assert_eq!(fields.last(), Some(&"debug"));
    }
}
