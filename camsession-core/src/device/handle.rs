//! Session-owned holder for the camera device

use std::sync::{Arc, Mutex, PoisonError};

use super::traits::CameraDevice;

/// Owns a session's device from construction until it is detached
///
/// The device is only ever borrowed out transiently (for a single driver
/// call) and is disconnected exactly once.
pub struct DeviceHandle {
    device: Mutex<Option<Arc<dyn CameraDevice>>>,
}

impl DeviceHandle {
    pub fn new(device: Box<dyn CameraDevice>) -> Self {
        Self {
            device: Mutex::new(Some(Arc::from(device))),
        }
    }

    /// Whether a device is still attached
    pub fn is_attached(&self) -> bool {
        self.lock().is_some()
    }

    /// The attached device, for one call made without holding the lock
    pub(crate) fn current(&self) -> Option<Arc<dyn CameraDevice>> {
        self.lock().clone()
    }

    /// Detach and disconnect the device
    ///
    /// Returns `false` if nothing was attached. The device is disconnected
    /// after the lock is released, so notifications it delivers meanwhile
    /// may freely observe the handle as detached.
    pub fn detach(&self) -> bool {
        let Some(device) = self.lock().take() else {
            return false;
        };
        device.disconnect();
        true
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Arc<dyn CameraDevice>>> {
        self.device.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
