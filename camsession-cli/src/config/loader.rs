use super::types::{RawDeviceOptions, RawLoggingConfig, RawSessionConfig};
use anyhow::Result;
use camsession_core::config::DEFAULT_LOG_LEVEL;
use camsession_core::{ConfigError, DeviceOptions, LoggingConfig, SessionConfig};
use std::path::{Path, PathBuf};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project)
    pub fn load() -> Result<SessionConfig> {
        Self::load_layers(
            Self::user_config_path().as_deref(),
            &Self::project_config_path(),
        )
    }

    /// Merge the user layer under the project layer; missing files are skipped
    pub fn load_layers(user: Option<&Path>, project: &Path) -> Result<SessionConfig> {
        let mut raw = RawSessionConfig::default();

        // Layer 1: User config
        if let Some(user_path) = user
            && user_path.exists()
        {
            raw = Self::merge_raw(raw, Self::read_layer(user_path)?);
        }

        // Layer 2: Project config
        if project.exists() {
            raw = Self::merge_raw(raw, Self::read_layer(project)?);
        }

        Ok(Self::finalize(raw))
    }

    /// Get user config path (platform-specific)
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("camsession").join("config.toml"))
    }

    /// Get project config path
    /// Can be overridden with CAMSESSION_PROJECT_CONFIG_DIR env var
    pub fn project_config_path() -> PathBuf {
        if let Ok(dir) = std::env::var("CAMSESSION_PROJECT_CONFIG_DIR") {
            PathBuf::from(dir).join("config.toml")
        } else {
            PathBuf::from(".camsession/config.toml")
        }
    }

    fn read_layer(path: &Path) -> Result<RawSessionConfig, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawSessionConfig, overlay: RawSessionConfig) -> RawSessionConfig {
        RawSessionConfig {
            service_pid: overlay.service_pid.or(base.service_pid),
            monitor_tags: overlay.monitor_tags.or(base.monitor_tags),
            device: RawDeviceOptions {
                override_for_perf_class: overlay
                    .device
                    .override_for_perf_class
                    .or(base.device.override_for_perf_class),
                legacy_client: overlay.device.legacy_client.or(base.device.legacy_client),
            },
            logging: RawLoggingConfig {
                level: overlay.logging.level.or(base.logging.level),
            },
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawSessionConfig) -> SessionConfig {
        SessionConfig {
            service_pid: raw.service_pid.unwrap_or(0),
            monitor_tags: raw.monitor_tags.unwrap_or_default(),
            device: DeviceOptions {
                override_for_perf_class: raw.device.override_for_perf_class.unwrap_or(false),
                legacy_client: raw.device.legacy_client.unwrap_or(false),
            },
            logging: LoggingConfig {
                level: raw
                    .logging
                    .level
                    .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            },
        }
    }
}
