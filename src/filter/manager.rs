//! Named filters available to formulas.

use super::{FilterError, FilterFactory, SharedFilter};
use serde_json::Value;
use std::{collections::BTreeMap, sync::Arc};

/// Filter name → configured filter.
///
/// Built eagerly from configuration so a misspelt filter fails at startup
/// rather than on first use.
#[derive(Debug, Clone, Default)]
pub struct FilterManager {
    filters: BTreeMap<String, SharedFilter>,
}

impl FilterManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve every `(name, options)` entry through `factory`.
    pub fn from_config<'a>(
        factory: &FilterFactory,
        entries: impl IntoIterator<Item = (&'a String, &'a Value)>,
    ) -> Result<Self, FilterError> {
        let mut manager = Self::new();
        for (name, options) in entries {
            let filter = factory.resolve(name, options)?;
            manager.set(name, Arc::new(filter));
        }
        Ok(manager)
    }

    pub fn set(&mut self, name: &str, filter: SharedFilter) {
        self.filters.insert(name.to_string(), filter);
    }

    pub fn get(&self, name: &str) -> Result<SharedFilter, FilterError> {
        self.filters
            .get(name)
            .cloned()
            .ok_or_else(|| FilterError::UnknownFilter(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.filters.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, json};

    fn factory() -> FilterFactory {
        FilterFactory::with_binaries("java", "node", "ruby", &[], None)
    }

    #[test]
    fn test_from_config() {
        let entries: Map<String, Value> = serde_json::from_value(json!({
            "sass": { "style": "compressed" },
            "cssrewrite": null,
        }))
        .unwrap();
        let manager = FilterManager::from_config(&factory(), &entries).unwrap();

        assert!(manager.has("sass"));
        assert!(manager.has("cssrewrite"));
        assert_eq!(manager.get("sass").unwrap().name(), "sass");
        assert_eq!(manager.names().collect::<Vec<_>>(), ["cssrewrite", "sass"]);
    }

    #[test]
    fn test_fails_fast_on_unknown() {
        let entries: Map<String, Value> = serde_json::from_value(json!({
            "sass": {},
            "sassy": {},
        }))
        .unwrap();
        let err = FilterManager::from_config(&factory(), &entries).unwrap_err();
        assert!(matches!(err, FilterError::UnknownFilter(ref n) if n == "sassy"));
    }

    #[test]
    fn test_get_unregistered() {
        let manager = FilterManager::new();
        assert!(matches!(manager.get("less"), Err(FilterError::UnknownFilter(_))));
    }
}
