//! `{var}` placeholders in asset paths.

use std::collections::BTreeMap;

/// Replace `{var}` for each declared var that has a value.
///
/// Placeholders without a value are left as written.
pub fn resolve(template: &str, vars: &[String], values: &BTreeMap<String, String>) -> String {
    let mut out = template.to_string();
    for var in vars {
        if let Some(value) = values.get(var) {
            out = out.replace(&format!("{{{var}}}"), value);
        }
    }
    out
}
