//! Option lookup with defaults.
//!
//! A key that is present always wins, even when its value is `null`.

use super::FilterError;
use serde_json::{Map, Value};

/// What to do when a key is absent.
#[derive(Debug, Clone)]
pub enum Fallback {
    /// Absence is an error.
    Required,
    /// Use this value (which may be `Value::Null`).
    Value(Value),
}

impl From<Value> for Fallback {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// Fetch `key` from `options`, falling back as instructed.
pub fn get(options: &Map<String, Value>, key: &str, fallback: Fallback) -> Result<Value, FilterError> {
    if let Some(value) = options.get(key) {
        return Ok(value.clone());
    }
    match fallback {
        Fallback::Value(value) => Ok(value),
        Fallback::Required => Err(FilterError::MissingOption {
            key: key.to_string(),
        }),
    }
}

/// View an arbitrary JSON value as an options mapping; non-objects are empty.
pub fn as_options(value: &Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options() -> Map<String, Value> {
        as_options(&json!({ "bin": "/opt/sass", "timeout": null }))
    }

    #[test]
    fn test_present_key_wins() {
        let value = get(&options(), "bin", Fallback::Value(json!("/usr/bin/sass"))).unwrap();
        assert_eq!(value, json!("/opt/sass"));
    }

    #[test]
    fn test_present_null_is_returned() {
        let value = get(&options(), "timeout", Fallback::Value(json!(30))).unwrap();
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn test_default_used_when_absent() {
        let value = get(&options(), "style", Fallback::Value(Value::Null)).unwrap();
        assert_eq!(value, Value::Null);

        let value = get(&options(), "precision", json!(5).into()).unwrap();
        assert_eq!(value, json!(5));
    }

    #[test]
    fn test_required_missing() {
        let err = get(&options(), "jar", Fallback::Required).unwrap_err();
        assert!(matches!(err, FilterError::MissingOption { ref key } if key == "jar"));
        assert_eq!(err.to_string(), "Option \"jar\" is required.");
    }

    #[test]
    fn test_non_object_is_empty() {
        assert!(as_options(&json!("yes")).is_empty());
        assert!(as_options(&json!([1, 2])).is_empty());
        assert!(as_options(&Value::Null).is_empty());
        assert_eq!(as_options(&json!({ "a": 1 })).len(), 1);
    }
}
