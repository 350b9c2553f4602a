//! Core types for the sinklog library
//!
//! This module defines the severity domain, the sink status code, and the errors
//! returned by rendering, registration and configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result type for sinklog operations
pub type Result<T> = std::result::Result<T, SinkLogError>;

/// Status returned by a single sink invocation.
///
/// `0` means success. Any other value is a failure; the dispatch engine folds all
/// statuses of one call together with bitwise OR, so sinks should report failures
/// as distinct bits when callers need to tell them apart.
pub type SinkStatus = u32;

/// Severity name used for raw values outside the closed set
pub const UNKNOWN_SEVERITY: &str = "UNKNOWN";

/// Syslog severity levels, ordered from most to least severe.
///
/// Lower numeric value means higher severity, so `Severity::Emergency < Severity::Debug`.
///
/// Deserializes from a name in any case (`"warning"`, `"WARNING"`) or its numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "SeverityRepr")]
#[repr(u8)]
pub enum Severity {
    /// System is unusable
    Emergency = 0,
    /// Action must be taken immediately
    Alert = 1,
    /// Critical conditions
    Critical = 2,
    /// Error conditions
    Error = 3,
    /// Warning conditions
    Warning = 4,
    /// Normal but significant condition
    Notice = 5,
    /// Informational messages
    Info = 6,
    /// Debug-level messages
    Debug = 7,
}

impl Severity {
    /// All severities in declaration order
    pub const ALL: [Severity; 8] = [
        Severity::Emergency,
        Severity::Alert,
        Severity::Critical,
        Severity::Error,
        Severity::Warning,
        Severity::Notice,
        Severity::Info,
        Severity::Debug,
    ];

    /// Stable display name (e.g. `"WARNING"`)
    pub const fn name(self) -> &'static str {
        match self {
            Severity::Emergency => "EMERGENCY",
            Severity::Alert => "ALERT",
            Severity::Critical => "CRITICAL",
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Notice => "NOTICE",
            Severity::Info => "INFO",
            Severity::Debug => "DEBUG",
        }
    }

    /// Numeric syslog value
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// True if `self` is at least as important as `threshold`
    pub fn passes(self, threshold: Severity) -> bool {
        self <= threshold
    }
}

/// Name of a raw severity value, `"UNKNOWN"` for anything outside `0..=7`
pub fn severity_name(value: u8) -> &'static str {
    Severity::try_from(value).map_or(UNKNOWN_SEVERITY, Severity::name)
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for Severity {
    type Error = ConfigError;

    fn try_from(value: u8) -> std::result::Result<Self, ConfigError> {
        Severity::ALL
            .get(usize::from(value))
            .copied()
            .ok_or_else(|| ConfigError::UnknownSeverity(value.to_string()))
    }
}

impl FromStr for Severity {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, ConfigError> {
        let trimmed = s.trim();
        if let Ok(value) = trimmed.parse::<u8>() {
            return Severity::try_from(value);
        }
        Severity::ALL
            .iter()
            .copied()
            .find(|sev| sev.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ConfigError::UnknownSeverity(trimmed.to_string()))
    }
}

/// Accepted serialized forms of a severity
#[derive(Deserialize)]
#[serde(untagged)]
enum SeverityRepr {
    Value(u8),
    Name(String),
}

impl TryFrom<SeverityRepr> for Severity {
    type Error = ConfigError;

    fn try_from(repr: SeverityRepr) -> std::result::Result<Self, ConfigError> {
        match repr {
            SeverityRepr::Value(value) => Severity::try_from(value),
            SeverityRepr::Name(name) => name.parse(),
        }
    }
}

/// Errors raised while rendering a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to format message")]
    Primary,

    /// Composing the prefixed variant failed. The composition only formats
    /// already-rendered strings into an infallible buffer, so this is not expected
    /// in practice.
    #[error("Failed to format severity-prefixed message")]
    Prefixed,
}

/// Errors raised while registering a sink
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Failed to grow sink registry to {requested} slots")]
    AllocationFailure { requested: usize },
}

impl RegistryError {
    /// Nonzero integer code for callers that keep the int-returning contract
    pub fn code(&self) -> i32 {
        match self {
            RegistryError::AllocationFailure { .. } => 1,
        }
    }
}

/// Errors raised while validating settings
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid message capacity: {0} (must be at least 2)")]
    InvalidCapacity(usize),

    #[error("Registry growth increment must be nonzero")]
    InvalidIncrement,

    #[error("Unknown severity: {0}")]
    UnknownSeverity(String),
}

/// Umbrella error for library operations
#[derive(Debug, thiserror::Error)]
pub enum SinkLogError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Asynchronous dispatch is not supported")]
    AsyncUnsupported,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_names() {
        assert_eq!(Severity::Emergency.name(), "EMERGENCY");
        assert_eq!(Severity::Warning.name(), "WARNING");
        assert_eq!(Severity::Debug.to_string(), "DEBUG");
    }

    #[test]
    fn test_unknown_severity_name() {
        assert_eq!(severity_name(4), "WARNING");
        assert_eq!(severity_name(8), UNKNOWN_SEVERITY);
        assert_eq!(severity_name(u8::MAX), UNKNOWN_SEVERITY);
    }

    #[test]
    fn test_ordering_more_severe_is_smaller() {
        assert!(Severity::Emergency < Severity::Alert);
        assert!(Severity::Info < Severity::Debug);
        for (i, sev) in Severity::ALL.iter().enumerate() {
            assert_eq!(usize::from(sev.value()), i);
        }
    }

    #[test]
    fn test_passes_threshold() {
        assert!(Severity::Warning.passes(Severity::Info));
        assert!(Severity::Info.passes(Severity::Info));
        assert!(!Severity::Debug.passes(Severity::Info));
    }

    #[test]
    fn test_parse_severity() {
        assert_eq!("warning".parse::<Severity>().unwrap(), Severity::Warning);
        assert_eq!("CRITICAL".parse::<Severity>().unwrap(), Severity::Critical);
        assert_eq!("3".parse::<Severity>().unwrap(), Severity::Error);
        assert!("verbose".parse::<Severity>().is_err());
        assert!(Severity::try_from(9).is_err());
    }

    #[test]
    fn test_deserialize_any_case_or_number() {
        #[derive(Deserialize)]
        struct Wrapper {
            threshold: Severity,
        }

        let parse = |src: &str| toml::from_str::<Wrapper>(src).map(|w| w.threshold);
        assert_eq!(parse(r#"threshold = "WARNING""#).unwrap(), Severity::Warning);
        assert_eq!(parse(r#"threshold = "Notice""#).unwrap(), Severity::Notice);
        assert_eq!(parse(r#"threshold = "debug""#).unwrap(), Severity::Debug);
        assert_eq!(parse("threshold = 2").unwrap(), Severity::Critical);
        assert!(parse(r#"threshold = "verbose""#).is_err());
        assert!(parse("threshold = 8").is_err());
    }

    #[test]
    fn test_serialize_lowercase_name() {
        #[derive(Serialize)]
        struct Wrapper {
            threshold: Severity,
        }

        let out = toml::to_string(&Wrapper {
            threshold: Severity::Alert,
        })
        .unwrap();
        assert_eq!(out.trim(), r#"threshold = "alert""#);
    }

    #[test]
    fn test_registry_error_code_nonzero() {
        let err = RegistryError::AllocationFailure { requested: 10 };
        assert_ne!(err.code(), 0);
    }
}
