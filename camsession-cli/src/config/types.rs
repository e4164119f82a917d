//! Partially specified config layers
//!
//! Every field is optional so a layer only overrides what it sets.

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct RawSessionConfig {
    pub service_pid: Option<i32>,
    pub monitor_tags: Option<Vec<String>>,
    #[serde(default)]
    pub device: RawDeviceOptions,
    #[serde(default)]
    pub logging: RawLoggingConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawDeviceOptions {
    pub override_for_perf_class: Option<bool>,
    pub legacy_client: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawLoggingConfig {
    pub level: Option<String>,
}
