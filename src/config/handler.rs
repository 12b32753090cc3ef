//! Lambda-level settings read from the function environment.

use std::fmt;
use std::str::FromStr;

use super::ConfigError;

/// Log level variable (`DEBUG`, `INFO`, `WARNING`, `ERROR`, `CRITICAL`).
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";
/// Size of the blocking worker pool.
pub const MAX_WORKERS_ENV: &str = "MAX_WORKERS";
/// Handler name configured on the function.
pub const HANDLER_ENV: &str = "_HANDLER";

const DEFAULT_LOG_LEVEL: &str = "INFO";
const DEFAULT_MAX_WORKERS: usize = 4;

/// Which entry point the bootstrap binary serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    /// Echo handler.
    Sample,
    /// SES identity custom resource.
    Identity,
    /// Active receipt rule set custom resource.
    RuleSet,
    /// SNS verification-link follower.
    Verification,
}

impl HandlerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandlerKind::Sample => "sample",
            HandlerKind::Identity => "identity",
            HandlerKind::RuleSet => "ruleset",
            HandlerKind::Verification => "verification",
        }
    }
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HandlerKind {
    type Err = ConfigError;

    /// Accepts bare names as well as dotted handler paths such as
    /// `app.ses.identity_handler` (the last segment decides).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.rsplit('.').next().unwrap_or(s).to_ascii_lowercase();
        match name.trim_end_matches("_handler") {
            "sample" | "handler" | "" => Ok(HandlerKind::Sample),
            "identity" => Ok(HandlerKind::Identity),
            "ruleset" | "rule_set" => Ok(HandlerKind::RuleSet),
            "verification" => Ok(HandlerKind::Verification),
            _ => Err(ConfigError::Invalid {
                message: format!("unknown handler '{}'", s),
            }),
        }
    }
}

/// Settings shared by every handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    /// Level as configured, e.g. `INFO`.
    pub log_level: String,
    /// Permits in the blocking worker pool.
    pub max_workers: usize,
    /// Selected entry point.
    pub handler: HandlerKind,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            max_workers: DEFAULT_MAX_WORKERS,
            handler: HandlerKind::Sample,
        }
    }
}

impl HandlerConfig {
    /// Read `LOG_LEVEL`, `MAX_WORKERS` and `_HANDLER` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_level = lookup(LOG_LEVEL_ENV)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        level_directive(&log_level)?;

        let max_workers = match lookup(MAX_WORKERS_ENV).filter(|v| !v.trim().is_empty()) {
            Some(raw) => {
                let parsed: usize = raw.trim().parse().map_err(|_| ConfigError::Environment {
                    message: format!("{} must be a positive integer, got '{}'", MAX_WORKERS_ENV, raw),
                })?;
                if parsed == 0 {
                    return Err(ConfigError::Invalid {
                        message: format!("{} must be at least 1", MAX_WORKERS_ENV),
                    });
                }
                parsed
            }
            None => DEFAULT_MAX_WORKERS,
        };

        let handler = match lookup(HANDLER_ENV) {
            Some(raw) => raw.parse()?,
            None => HandlerKind::Sample,
        };

        Ok(Self {
            log_level,
            max_workers,
            handler,
        })
    }

    /// The `tracing` filter directive for the configured level.
    pub fn filter_directive(&self) -> &'static str {
        // validated in from_lookup
        level_directive(&self.log_level).unwrap_or("info")
    }
}

/// Map a level name such as `WARNING` onto a `tracing` level directive.
pub fn level_directive(level: &str) -> Result<&'static str, ConfigError> {
    match level.trim().to_ascii_uppercase().as_str() {
        "NOTSET" | "TRACE" => Ok("trace"),
        "DEBUG" => Ok("debug"),
        "INFO" => Ok("info"),
        "WARNING" | "WARN" => Ok("warn"),
        "ERROR" | "CRITICAL" | "FATAL" => Ok("error"),
        _ => Err(ConfigError::Invalid {
            message: format!("unknown log level '{}'", level),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = HandlerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, HandlerConfig::default());
        assert_eq!(config.filter_directive(), "info");
        assert_eq!(config.max_workers, 4);
    }

    #[test]
    fn test_reads_values() {
        let config = HandlerConfig::from_lookup(lookup(&[
            ("LOG_LEVEL", "DEBUG"),
            ("MAX_WORKERS", "8"),
            ("_HANDLER", "identity"),
        ]))
        .unwrap();
        assert_eq!(config.filter_directive(), "debug");
        assert_eq!(config.max_workers, 8);
        assert_eq!(config.handler, HandlerKind::Identity);
    }

    #[rstest]
    #[case("abc")]
    #[case("-1")]
    fn test_invalid_max_workers(#[case] raw: &str) {
        let result = HandlerConfig::from_lookup(lookup(&[("MAX_WORKERS", raw)]));
        assert!(matches!(result, Err(ConfigError::Environment { .. })));
    }

    #[test]
    fn test_zero_max_workers() {
        let result = HandlerConfig::from_lookup(lookup(&[("MAX_WORKERS", "0")]));
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_unknown_log_level() {
        let result = HandlerConfig::from_lookup(lookup(&[("LOG_LEVEL", "LOUD")]));
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[rstest]
    #[case("WARNING", "warn")]
    #[case("critical", "error")]
    #[case("NOTSET", "trace")]
    fn test_level_directive(#[case] level: &str, #[case] expected: &str) {
        assert_eq!(level_directive(level).unwrap(), expected);
    }

    #[rstest]
    #[case("sample", HandlerKind::Sample)]
    #[case("app.handler", HandlerKind::Sample)]
    #[case("app.ses.identity_handler", HandlerKind::Identity)]
    #[case("ruleset", HandlerKind::RuleSet)]
    #[case("app.ses.verification_handler", HandlerKind::Verification)]
    fn test_handler_kind_parse(#[case] raw: &str, #[case] expected: HandlerKind) {
        assert_eq!(raw.parse::<HandlerKind>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_handler() {
        assert!("bogus".parse::<HandlerKind>().is_err());
    }
}
