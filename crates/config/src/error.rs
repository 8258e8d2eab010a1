//! Configuration error types.

/// Errors from loading, parsing, or validating a tunnel configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
