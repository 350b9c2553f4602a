//! Configuration loading and parsing

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sinklog::{Settings, SinkConfig};
use std::fs;
use std::path::Path;

/// Application configuration (loaded from a TOML file)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub settings: Settings,
    /// Sink slots to preallocate before registration
    #[serde(default)]
    pub capacity: usize,
    #[serde(default)]
    pub sinks: Vec<SinkConfig>,
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    config
        .settings
        .validate()
        .with_context(|| format!("Invalid settings in config file: {:?}", path))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sinklog::Severity;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            capacity = 4

            [settings]
            threshold = "notice"

            [settings.flags]
            append_newline = true

            [[sinks]]
            kind = "stderr"

            [[sinks]]
            kind = "file"
            path = "logs/app.log"
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.capacity, 4);
        assert_eq!(config.settings.threshold, Severity::Notice);
        assert!(config.settings.flags.append_newline);
        assert_eq!(config.sinks.len(), 2);
        assert_eq!(
            config.sinks[1],
            SinkConfig::File {
                path: PathBuf::from("logs/app.log")
            }
        );
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.sinks.is_empty());
        assert_eq!(config.settings, Settings::default());
    }

    #[test]
    fn test_load_config_rejects_invalid_settings() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[settings]\nmax_length = 1").unwrap();
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_load_config_missing_file() {
        assert!(load_config(Path::new("/definitely/not/here.toml")).is_err());
    }
}
