use thiserror::Error;

/// Errors raised while signing a request.
#[derive(Debug, Error)]
pub enum SigningError {
    /// A header value could not be represented.
    #[error("Invalid header {header}: {message}")]
    InvalidHeader {
        /// Header name.
        header: String,
        /// Reason.
        message: String,
    },

    /// Signing could not proceed.
    #[error("Signing failed: {message}")]
    SigningFailed {
        /// Reason.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let error = SigningError::InvalidHeader {
            header: "x-amz-security-token".to_string(),
            message: "contains newline".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid header x-amz-security-token: contains newline"
        );
    }
}
