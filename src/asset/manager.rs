//! Named formulas and lazy asset creation.

use super::{Asset, AssetError, AssetFactory, Formula};
use std::collections::BTreeMap;

/// Formulas by asset name.
///
/// Static formulas come from configuration; template formulas are added by
/// discovery and never replace a static one with the same name.
#[derive(Debug, Default)]
pub struct AssetManager {
    configured: BTreeMap<String, Formula>,
    discovered: BTreeMap<String, Formula>,
}

impl AssetManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a formula from configuration.
    pub fn set_formula(&mut self, name: &str, formula: Formula) {
        self.configured.insert(name.to_string(), formula);
    }

    /// Register formulas found in templates.
    pub fn add_formulas(&mut self, formulas: impl IntoIterator<Item = (String, Formula)>) {
        for (name, formula) in formulas {
            self.discovered.insert(name, formula);
        }
    }

    pub fn clear_discovered(&mut self) {
        self.discovered.clear();
    }

    pub fn has(&self, name: &str) -> bool {
        self.configured.contains_key(name) || self.discovered.contains_key(name)
    }

    pub fn formula(&self, name: &str) -> Option<&Formula> {
        self.configured.get(name).or_else(|| self.discovered.get(name))
    }

    /// All asset names, sorted and unique.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.configured.keys().chain(self.discovered.keys()).cloned().collect();
        names.sort();
        names.dedup();
        names
    }

    /// Create the asset `name`, following `@name` references.
    pub fn get(&self, name: &str, factory: &AssetFactory) -> Result<Asset, AssetError> {
        let mut stack = Vec::new();
        self.create(name, factory, &mut stack)
    }

    fn create(&self, name: &str, factory: &AssetFactory, stack: &mut Vec<String>) -> Result<Asset, AssetError> {
        if stack.iter().any(|n| n == name) {
            return Err(AssetError::Circular(name.to_string()));
        }
        let formula = self
            .formula(name)
            .ok_or_else(|| AssetError::UnknownAsset(name.to_string()))?;

        let mut formula = formula.clone();
        formula.options.name.get_or_insert_with(|| name.to_string());

        stack.push(name.to_string());
        let asset = factory.create(&formula, &mut |reference| self.create(reference, factory, stack));
        stack.pop();
        asset
    }
}
