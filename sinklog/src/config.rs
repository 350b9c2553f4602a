//! Logger configuration types
//!
//! This module defines the settings a [`Logger`](crate::Logger) is built from: the
//! severity threshold, behavior flags, the message buffer capacity and the registry
//! growth increment. Sinks themselves are registered at runtime; [`SinkConfig`] is a
//! declarative form of the built-in sinks for configuration files.

use crate::types::{ConfigError, Severity};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default capacity of each rendered message buffer, in bytes
pub const DEFAULT_MAX_LENGTH: usize = 1024;

/// Default number of slots the registry grows by when full
pub const DEFAULT_REGISTRY_INCREMENT: usize = 10;

/// Behavior flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flags {
    /// Request asynchronous delivery (not supported, see [`Logger::submit`](crate::Logger::submit))
    #[serde(default)]
    pub async_mode: bool,

    /// Append a newline to each rendered message
    #[serde(default)]
    pub append_newline: bool,

    /// Request colored output (accepted, currently has no effect)
    #[serde(default)]
    pub color: bool,
}

impl Flags {
    pub const NONE: u32 = 0b000;
    pub const ASYNC: u32 = 0b001;
    pub const NEWLINE: u32 = 0b010;
    pub const COLOR: u32 = 0b100;

    /// Decode flags from their bit encoding, ignoring unknown bits
    pub fn from_bits(bits: u32) -> Self {
        Self {
            async_mode: bits & Self::ASYNC != 0,
            append_newline: bits & Self::NEWLINE != 0,
            color: bits & Self::COLOR != 0,
        }
    }

    /// Bit encoding of these flags
    pub fn bits(&self) -> u32 {
        let mut bits = Self::NONE;
        if self.async_mode {
            bits |= Self::ASYNC;
        }
        if self.append_newline {
            bits |= Self::NEWLINE;
        }
        if self.color {
            bits |= Self::COLOR;
        }
        bits
    }
}

/// Settings for a logger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Messages less severe than this are dropped
    #[serde(default = "default_threshold")]
    pub threshold: Severity,

    /// Behavior flags
    #[serde(default)]
    pub flags: Flags,

    /// Capacity of each rendered message buffer, terminator slot included
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Slots added to the registry each time it fills up
    #[serde(default = "default_registry_increment")]
    pub registry_increment: usize,
}

fn default_threshold() -> Severity {
    Severity::Debug
}

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

fn default_registry_increment() -> usize {
    DEFAULT_REGISTRY_INCREMENT
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            flags: Flags::default(),
            max_length: default_max_length(),
            registry_increment: default_registry_increment(),
        }
    }
}

impl Settings {
    /// Create settings with default values (nothing filtered, no flags)
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the severity threshold
    pub fn with_threshold(mut self, threshold: Severity) -> Self {
        self.threshold = threshold;
        self
    }

    /// Builder method: replace all flags
    pub fn with_flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }

    /// Builder method: enable or disable newline appending
    pub fn with_newline(mut self, enabled: bool) -> Self {
        self.flags.append_newline = enabled;
        self
    }

    /// Builder method: set the message buffer capacity
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Builder method: set the registry growth increment
    pub fn with_registry_increment(mut self, increment: usize) -> Self {
        self.registry_increment = increment;
        self
    }

    /// Check that the settings can drive a logger
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_length < 2 {
            return Err(ConfigError::InvalidCapacity(self.max_length));
        }
        if self.registry_increment == 0 {
            return Err(ConfigError::InvalidIncrement);
        }
        Ok(())
    }
}

/// Declarative form of the built-in sinks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SinkConfig {
    /// Unbuffered console sink on standard output
    Stdout,
    /// Console sink on standard error
    Stderr,
    /// Append to a file, opened and closed on every dispatch
    File { path: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_builder() {
        let settings = Settings::new()
            .with_threshold(Severity::Info)
            .with_newline(true)
            .with_max_length(64)
            .with_registry_increment(4);

        assert_eq!(settings.threshold, Severity::Info);
        assert!(settings.flags.append_newline);
        assert!(!settings.flags.async_mode);
        assert_eq!(settings.max_length, 64);
        assert_eq!(settings.registry_increment, 4);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.threshold, Severity::Debug);
        assert_eq!(settings.max_length, DEFAULT_MAX_LENGTH);
        assert_eq!(settings.registry_increment, DEFAULT_REGISTRY_INCREMENT);
        assert_eq!(settings.flags.bits(), Flags::NONE);
    }

    #[test]
    fn test_validate_rejects_tiny_capacity() {
        assert_eq!(
            Settings::new().with_max_length(1).validate(),
            Err(ConfigError::InvalidCapacity(1))
        );
        assert_eq!(
            Settings::new().with_registry_increment(0).validate(),
            Err(ConfigError::InvalidIncrement)
        );
    }

    #[test]
    fn test_flag_bits() {
        let flags = Flags::from_bits(Flags::NEWLINE | Flags::COLOR);
        assert!(flags.append_newline);
        assert!(flags.color);
        assert!(!flags.async_mode);
        assert_eq!(flags.bits(), 0b110);
        assert_eq!(Flags::from_bits(0b1000), Flags::default());
    }

    #[test]
    fn test_settings_deserialization() {
        let toml_content = r#"
            threshold = "warning"
            max_length = 256

            [flags]
            append_newline = true
        "#;

        let settings: Settings = toml::from_str(toml_content).unwrap();
        assert_eq!(settings.threshold, Severity::Warning);
        assert_eq!(settings.max_length, 256);
        assert!(settings.flags.append_newline);
        assert_eq!(settings.registry_increment, DEFAULT_REGISTRY_INCREMENT);
    }

    #[test]
    fn test_sink_config_deserialization() {
        #[derive(Deserialize)]
        struct Wrapper {
            sinks: Vec<SinkConfig>,
        }

        let toml_content = r#"
            [[sinks]]
            kind = "stdout"

            [[sinks]]
            kind = "file"
            path = "app.log"
        "#;

        let wrapper: Wrapper = toml::from_str(toml_content).unwrap();
        assert_eq!(wrapper.sinks.len(), 2);
        assert_eq!(wrapper.sinks[0], SinkConfig::Stdout);
        assert_eq!(
            wrapper.sinks[1],
            SinkConfig::File {
                path: PathBuf::from("app.log")
            }
        );
    }
}
