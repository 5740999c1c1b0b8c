//! Filter error types.

use thiserror::Error;

/// Errors raised while configuring or running a filter.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A required option is absent from the filter's settings.
    #[error("Option \"{key}\" is required.")]
    MissingOption { key: String },

    /// The filter name has no entry in the registry.
    #[error("There is no \"{0}\" filter.")]
    UnknownFilter(String),

    /// An option has the wrong JSON type.
    #[error("Option \"{key}\" of filter \"{filter}\" must be {expected}")]
    InvalidOption {
        filter: String,
        key: String,
        expected: &'static str,
    },

    /// The transformation itself failed (external program, parse error).
    #[error("Filter \"{filter}\" failed: {message}")]
    Failed { filter: String, message: String },
}

impl FilterError {
    pub(crate) fn failed(filter: &str, message: impl Into<String>) -> Self {
        Self::Failed {
            filter: filter.to_string(),
            message: message.into(),
        }
    }
}
