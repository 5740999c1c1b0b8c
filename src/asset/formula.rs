//! Formulas: the recipe an asset is created from.

use crate::utils::hash::KeyHasher;
use serde::Deserialize;

/// Output pattern used when a formula names none.
pub const DEFAULT_OUTPUT: &str = "*";

/// Length of generated asset names.
const NAME_LEN: usize = 7;

/// Inputs, filter names and options describing one asset.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Formula {
    pub inputs: Vec<String>,
    pub filters: Vec<String>,
    #[serde(flatten)]
    pub options: FormulaOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormulaOptions {
    /// Target path, may contain `*` for the generated name.
    pub output: Option<String>,
    /// Explicit asset name; generated from the inputs otherwise.
    pub name: Option<String>,
    /// Per-asset debug override.
    pub debug: Option<bool>,
    /// Whether a collection is written as one file even in debug.
    pub combine: Option<bool>,
    pub vars: Vec<String>,
}

impl Formula {
    pub fn new(inputs: Vec<String>, filters: Vec<String>) -> Self {
        Self {
            inputs,
            filters,
            options: FormulaOptions::default(),
        }
    }

    /// Name an asset gets when its formula has none.
    ///
    /// Stable across runs: derived from inputs, filters, output and vars.
    pub fn generated_name(&self) -> String {
        let mut hasher = KeyHasher::new();
        for input in &self.inputs {
            hasher = hasher.field(input);
        }
        hasher = hasher.field("|");
        for filter in &self.filters {
            hasher = hasher.field(filter);
        }
        hasher = hasher
            .field("|")
            .field(self.options.output.as_deref().unwrap_or(DEFAULT_OUTPUT))
            .field(&self.options.vars.join(","));
        hasher.short(NAME_LEN)
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.options.output = Some(output.into());
        self
    }

    pub fn with_combine(mut self, combine: bool) -> Self {
        self.options.combine = Some(combine);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.options.debug = Some(debug);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_flat_options() {
        let formula: Formula = toml::from_str(
            r#"
            inputs = ["js/a.js", "js/b.js"]
            filters = ["?uglifyjs2"]
            output = "js/app.js"
            combine = false
            "#,
        )
        .unwrap();
        assert_eq!(formula.inputs.len(), 2);
        assert_eq!(formula.options.output.as_deref(), Some("js/app.js"));
        assert_eq!(formula.options.combine, Some(false));
        assert_eq!(formula.options.debug, None);
    }

    #[test]
    fn test_generated_name_stable() {
        let a = Formula::new(vec!["js/a.js".into()], vec![]);
        let b = Formula::new(vec!["js/b.js".into()], vec![]);
        assert_eq!(a.generated_name(), a.clone().generated_name());
        assert_ne!(a.generated_name(), b.generated_name());
        assert_eq!(a.generated_name().len(), NAME_LEN);
    }

    #[test]
    fn test_deserialize_empty() {
        let formula: Formula = toml::from_str("").unwrap();
        assert_eq!(formula, Formula::default());
    }
}
