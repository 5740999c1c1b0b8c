//! `[templates]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [templates]
//! enable = true
//! extension = "twig"
//!
//! [templates.paths]
//! __main__ = ["views"]
//! admin = ["admin/views"]
//! ```

use serde::Deserialize;
use std::{collections::BTreeMap, path::PathBuf};

/// Template discovery settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    /// Scan templates for asset tags during dump.
    pub enable: bool,

    /// File extension of template files, without the dot.
    pub extension: String,

    /// Namespace → search directories.
    pub paths: BTreeMap<String, Vec<PathBuf>>,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            enable: false,
            extension: "twig".to_string(),
            paths: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;
    use std::path::PathBuf;

    #[test]
    fn test_templates_config() {
        let config = test_parse_config(
            "[templates]\nenable = true\n[templates.paths]\n__main__ = [\"views\"]",
        );
        assert!(config.templates.enable);
        assert_eq!(config.templates.extension, "twig");
        assert_eq!(config.templates.paths["__main__"], [PathBuf::from("views")]);
    }

    #[test]
    fn test_templates_disabled_by_default() {
        let config = test_parse_config("");
        assert!(!config.templates.enable);
        assert!(config.templates.paths.is_empty());
    }
}
