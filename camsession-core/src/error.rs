//! Error types for camsession-core

use thiserror::Error;

/// Status reported by a camera device or its driver
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("Device not initialized")]
    NoInit,

    #[error("Bad value: {0}")]
    BadValue(String),

    #[error("Device timed out")]
    TimedOut,

    #[error("Device disconnected")]
    Disconnected,

    #[error("Device status {code}: {message}")]
    Status { code: i32, message: String },
}

/// Rejections from the ops accounting layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OpsError {
    #[error("Camera ops denied for {package}")]
    Denied { package: String },

    #[error("Ops accounting unavailable")]
    Unavailable,

    #[error("Ops status {0}")]
    Status(i32),
}

/// Errors returned from session control calls
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("No device connected")]
    NotInitialized,

    #[error("Connection attempt from pid {caller}; currently locked to pid {owner}")]
    AlreadyOwned { owner: i32, caller: i32 },

    #[error(
        "{location}: attempt to use a locked camera from a different process (old pid {owner}, new pid {caller})"
    )]
    PermissionDenied {
        location: String,
        owner: i32,
        caller: i32,
    },

    #[error(transparent)]
    Ops(#[from] OpsError),

    #[error(transparent)]
    Device(#[from] DeviceError),
}

/// Errors loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
