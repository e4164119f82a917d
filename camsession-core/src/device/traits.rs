//! CameraDevice trait and related types
//!
//! The device abstraction hides the driver's capture pipeline and HAL
//! negotiation; a session only needs to bring it up, tear it down, and
//! receive its notifications.

use std::io::Write;
use std::sync::Weak;

use serde::{Deserialize, Serialize};

use crate::error::DeviceError;
use crate::notify::NotificationListener;

/// Opaque handle to the provider layer that enumerates camera hardware
pub trait CameraProvider: Send + Sync {
    fn name(&self) -> &str;
}

/// Parameters a device is built with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSpec {
    pub camera_id: String,
    /// Report performance-class capabilities regardless of the hardware
    pub override_for_perf_class: bool,
    /// Client uses the legacy (api1) surface
    pub legacy_client: bool,
}

/// Trait for camera device handles
///
/// Devices run their own threads and are called concurrently, so every
/// method takes `&self`.
pub trait CameraDevice: Send + Sync {
    fn camera_id(&self) -> &str;

    /// Bind the device to the provider layer
    fn initialize(
        &self,
        provider: &dyn CameraProvider,
        monitor_tags: &str,
    ) -> Result<(), DeviceError>;

    /// Close the device
    ///
    /// Calling this on an already disconnected device is a no-op.
    fn disconnect(&self);

    /// Write the device's diagnostic state
    fn dump(&self, out: &mut dyn Write, args: &[String]) -> Result<(), DeviceError>;

    /// Register the notification sink
    ///
    /// The device must upgrade the reference before each delivery and drop
    /// the notification if the listener is gone.
    fn set_notify_callback(
        &self,
        listener: Weak<dyn NotificationListener>,
    ) -> Result<(), DeviceError>;
}

/// Factory for creating camera devices
pub trait DeviceFactory: Send + Sync {
    /// Build a device for `spec`, or `None` if the environment cannot
    fn create(&self, spec: &DeviceSpec) -> Option<Box<dyn CameraDevice>>;
}
