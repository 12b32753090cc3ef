//! Structured logging for the Lambda functions.
//!
//! Output is one JSON object per line on stdout, without timestamps (CloudWatch
//! stamps each line on ingestion) and without targets. The level comes from
//! `LOG_LEVEL`, which also accepts `WARNING` and `CRITICAL`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{ConfigError, HandlerConfig};

/// Build the filter for `config`'s level.
pub fn env_filter(config: &HandlerConfig) -> EnvFilter {
    EnvFilter::new(config.filter_directive())
}

/// Install the global subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init(config: &HandlerConfig) -> Result<(), ConfigError> {
    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            fmt::layer()
                .json()
                .with_target(false)
                .with_current_span(false)
                .without_time(),
        )
        .try_init()
        .map_err(|e| ConfigError::Invalid {
            message: format!("failed to install log subscriber: {}", e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("DEBUG", "debug")]
    #[case("WARNING", "warn")]
    #[case("CRITICAL", "error")]
    fn test_filter_follows_log_level(#[case] level: &str, #[case] expected: &str) {
        let config = HandlerConfig {
            log_level: level.to_string(),
            ..Default::default()
        };
        assert_eq!(env_filter(&config).to_string(), expected);
    }
}
