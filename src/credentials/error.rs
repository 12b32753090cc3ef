use std::fmt;

/// Why no usable signing credentials could be produced.
///
/// Inside Lambda the execution role's keys arrive through the environment, so
/// [`CredentialError::Missing`] usually means the function is running
/// somewhere else without a role.
#[derive(Debug)]
pub enum CredentialError {
    Missing { message: String },

    Invalid { message: String },

    /// The session token's expiry has passed.
    Expired,

    /// A provider, or the whole chain, came up empty.
    LoadFailed { source: String, message: String },

    /// `AWS_CONTAINER_CREDENTIALS_FULL_URI` (or the relative form) did not
    /// answer with a credential document.
    Container { message: String },
}

// Implemented by hand rather than with `thiserror`: the `source` field of
// `LoadFailed` is a provider name, not an underlying error.
impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { message } => write!(f, "Missing credentials: {message}"),
            Self::Invalid { message } => write!(f, "Invalid credentials: {message}"),
            Self::Expired => write!(f, "Expired credentials"),
            Self::LoadFailed { source, message } => {
                write!(f, "Failed to load credentials from {source}: {message}")
            }
            Self::Container { message } => write!(f, "Container credentials error: {message}"),
        }
    }
}

impl std::error::Error for CredentialError {}
