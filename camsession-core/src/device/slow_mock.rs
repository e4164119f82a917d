//! Slow mock device for concurrency testing
//!
//! SlowMockDevice wraps MockDevice and stalls inside disconnect, widening
//! the window in which driver notifications race with teardown.

use std::io::Write;
use std::sync::{Arc, Weak};
use std::time::Duration;

use super::mock::{MockDevice, MockDeviceProbe};
use super::traits::{CameraDevice, CameraProvider};
use crate::error::DeviceError;
use crate::notify::NotificationListener;

/// MockDevice wrapper that delays disconnect
pub struct SlowMockDevice {
    inner: MockDevice,
    delay: Duration,
}

impl SlowMockDevice {
    pub fn new(camera_id: impl Into<String>, delay: Duration) -> Self {
        Self {
            inner: MockDevice::new(camera_id),
            delay,
        }
    }

    pub fn probe(&self) -> Arc<MockDeviceProbe> {
        self.inner.probe()
    }
}

impl CameraDevice for SlowMockDevice {
    fn camera_id(&self) -> &str {
        self.inner.camera_id()
    }

    fn initialize(
        &self,
        provider: &dyn CameraProvider,
        monitor_tags: &str,
    ) -> Result<(), DeviceError> {
        self.inner.initialize(provider, monitor_tags)
    }

    fn disconnect(&self) {
        std::thread::sleep(self.delay);
        self.inner.disconnect();
    }

    fn dump(&self, out: &mut dyn Write, args: &[String]) -> Result<(), DeviceError> {
        self.inner.dump(out, args)
    }

    fn set_notify_callback(
        &self,
        listener: Weak<dyn NotificationListener>,
    ) -> Result<(), DeviceError> {
        self.inner.set_notify_callback(listener)
    }
}
