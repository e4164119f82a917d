//! Session configuration types

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::device::DeviceSpec;
use crate::error::ConfigError;

/// Default log filter
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration for sessions opened by this process
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Pid of the hosting service, always allowed to disconnect clients
    #[serde(default)]
    pub service_pid: i32,

    /// Diagnostic monitor tags passed to device initialization
    #[serde(default)]
    pub monitor_tags: Vec<String>,

    #[serde(default)]
    pub device: DeviceOptions,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Capability flags applied when building a device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceOptions {
    #[serde(default)]
    pub override_for_perf_class: bool,

    #[serde(default)]
    pub legacy_client: bool,
}

impl DeviceOptions {
    /// Device spec for `camera_id` with these options
    pub fn spec(&self, camera_id: impl Into<String>) -> DeviceSpec {
        DeviceSpec {
            camera_id: camera_id.into(),
            override_for_perf_class: self.override_for_perf_class,
            legacy_client: self.legacy_client,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// tracing env-filter directive
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl SessionConfig {
    /// Parse a config from TOML text
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Monitor tags in the form device initialization expects
    pub fn monitor_tags_string(&self) -> String {
        self.monitor_tags.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_has_info_logging() {
        let config = SessionConfig::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.service_pid, 0);
        assert!(!config.device.override_for_perf_class);
        assert!(config.monitor_tags.is_empty());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config = SessionConfig::from_toml(
            r#"
            service_pid = 5

            [device]
            legacy_client = true
            "#,
        )
        .unwrap();

        assert_eq!(config.service_pid, 5);
        assert!(config.device.legacy_client);
        assert!(!config.device.override_for_perf_class);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn monitor_tags_join_with_spaces() {
        let config = SessionConfig {
            monitor_tags: vec!["+3a".to_string(), "-ae.lock".to_string()],
            ..SessionConfig::default()
        };
        assert_eq!(config.monitor_tags_string(), "+3a -ae.lock");
    }

    #[test]
    fn device_options_build_spec() {
        let options = DeviceOptions {
            override_for_perf_class: true,
            legacy_client: false,
        };
        let spec = options.spec("1");
        assert_eq!(spec.camera_id, "1");
        assert!(spec.override_for_perf_class);
        assert!(!spec.legacy_client);
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "monitor_tags = [\"+3a\"]\n[logging]\nlevel = \"debug\""
        )
        .unwrap();

        let config = SessionConfig::load(file.path()).unwrap();

        assert_eq!(config.monitor_tags, vec!["+3a".to_string()]);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let result = SessionConfig::load("/nonexistent/camsession/config.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn toml_roundtrip() {
        let config = SessionConfig {
            service_pid: 9,
            monitor_tags: vec!["+3a".to_string()],
            device: DeviceOptions {
                override_for_perf_class: true,
                legacy_client: true,
            },
            logging: LoggingConfig::default(),
        };
        let text = toml::to_string(&config).unwrap();
        assert_eq!(SessionConfig::from_toml(&text).unwrap(), config);
    }
}
