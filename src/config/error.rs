use thiserror::Error;

/// Raised while building [`SesConfig`](super::SesConfig) or reading the
/// handler settings from the Lambda environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {field}")]
    MissingField { field: String },

    /// A value parsed but is out of range, e.g. `MAX_WORKERS=0` or an
    /// unknown `_HANDLER` name.
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    /// An environment variable could not be read or parsed.
    #[error("Environment error: {message}")]
    Environment { message: String },
}
