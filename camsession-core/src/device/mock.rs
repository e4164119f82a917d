//! Mock camera device for tests and simulation
//!
//! MockDevice records every call it receives in a shared [`MockDeviceProbe`]
//! so tests can inspect the device after handing it to a session, and can
//! play the driver thread by delivering notifications through the
//! registered listener.

use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use super::traits::{CameraDevice, CameraProvider, DeviceFactory, DeviceSpec};
use crate::error::DeviceError;
use crate::notify::NotificationListener;

/// Shared view of a MockDevice's recorded calls and scripted results
#[derive(Default)]
pub struct MockDeviceProbe {
    initialize_calls: AtomicUsize,
    disconnect_calls: AtomicUsize,
    dump_calls: AtomicUsize,
    disconnected: AtomicBool,
    monitor_tags: Mutex<Option<String>>,
    initialize_result: Mutex<Option<DeviceError>>,
    dump_result: Mutex<Option<DeviceError>>,
    listener: Mutex<Option<Weak<dyn NotificationListener>>>,
    idle_on_disconnect: AtomicBool,
}

impl MockDeviceProbe {
    pub fn initialize_count(&self) -> usize {
        self.initialize_calls.load(Ordering::SeqCst)
    }

    pub fn disconnect_count(&self) -> usize {
        self.disconnect_calls.load(Ordering::SeqCst)
    }

    pub fn dump_count(&self) -> usize {
        self.dump_calls.load(Ordering::SeqCst)
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected.load(Ordering::SeqCst)
    }

    /// Tags passed to the last initialize call
    pub fn monitor_tags(&self) -> Option<String> {
        lock(&self.monitor_tags).clone()
    }

    /// Make the next initialize call fail with `error`
    pub fn fail_initialize(&self, error: DeviceError) {
        *lock(&self.initialize_result) = Some(error);
    }

    /// Make dump calls fail with `error`
    pub fn fail_dump(&self, error: DeviceError) {
        *lock(&self.dump_result) = Some(error);
    }

    /// Deliver an idle notification from inside disconnect, like a driver
    /// flushing its pipeline
    pub fn idle_on_disconnect(&self, enabled: bool) {
        self.idle_on_disconnect.store(enabled, Ordering::SeqCst);
    }

    /// Whether a listener was ever registered
    pub fn has_listener(&self) -> bool {
        lock(&self.listener).is_some()
    }

    /// Upgrade the registered listener for a single delivery
    ///
    /// Returns `None` once the listener has been dropped.
    pub fn listener(&self) -> Option<Arc<dyn NotificationListener>> {
        lock(&self.listener).as_ref().and_then(Weak::upgrade)
    }
}

/// Mock implementation of CameraDevice
pub struct MockDevice {
    camera_id: String,
    probe: Arc<MockDeviceProbe>,
}

impl MockDevice {
    pub fn new(camera_id: impl Into<String>) -> Self {
        Self {
            camera_id: camera_id.into(),
            probe: Arc::new(MockDeviceProbe::default()),
        }
    }

    /// Handle for inspecting this device after it has been moved
    pub fn probe(&self) -> Arc<MockDeviceProbe> {
        Arc::clone(&self.probe)
    }
}

impl CameraDevice for MockDevice {
    fn camera_id(&self) -> &str {
        &self.camera_id
    }

    fn initialize(
        &self,
        _provider: &dyn CameraProvider,
        monitor_tags: &str,
    ) -> Result<(), DeviceError> {
        self.probe.initialize_calls.fetch_add(1, Ordering::SeqCst);
        *lock(&self.probe.monitor_tags) = Some(monitor_tags.to_string());

        match lock(&self.probe.initialize_result).take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn disconnect(&self) {
        self.probe.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        if self.probe.disconnected.swap(true, Ordering::SeqCst) {
            return;
        }

        if self.probe.idle_on_disconnect.load(Ordering::SeqCst)
            && let Some(listener) = self.probe.listener()
        {
            listener.notify_idle(0, 0, false, &[]);
        }
    }

    fn dump(&self, out: &mut dyn Write, _args: &[String]) -> Result<(), DeviceError> {
        self.probe.dump_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = lock(&self.probe.dump_result).clone() {
            return Err(error);
        }

        writeln!(out, "    Mock device {}", self.camera_id).map_err(|e| DeviceError::Status {
            code: -5,
            message: e.to_string(),
        })?;
        Ok(())
    }

    fn set_notify_callback(
        &self,
        listener: Weak<dyn NotificationListener>,
    ) -> Result<(), DeviceError> {
        *lock(&self.probe.listener) = Some(listener);
        Ok(())
    }
}

/// Factory for creating MockDevice instances
///
/// Keeps the probe of every device it builds, in creation order.
#[derive(Default)]
pub struct MockDeviceFactory {
    probes: Mutex<Vec<Arc<MockDeviceProbe>>>,
    specs: Mutex<Vec<DeviceSpec>>,
    yields_nothing: bool,
}

impl MockDeviceFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory whose construction always fails
    pub fn failing() -> Self {
        Self {
            yields_nothing: true,
            ..Self::default()
        }
    }

    /// Probe of the most recently created device
    pub fn last_probe(&self) -> Option<Arc<MockDeviceProbe>> {
        lock(&self.probes).last().cloned()
    }

    /// Spec of the most recently created device
    pub fn last_spec(&self) -> Option<DeviceSpec> {
        lock(&self.specs).last().cloned()
    }
}

impl DeviceFactory for MockDeviceFactory {
    fn create(&self, spec: &DeviceSpec) -> Option<Box<dyn CameraDevice>> {
        lock(&self.specs).push(spec.clone());
        if self.yields_nothing {
            return None;
        }

        let device = MockDevice::new(spec.camera_id.clone());
        lock(&self.probes).push(device.probe());
        Some(Box::new(device))
    }
}

/// Provider placeholder for mock devices
#[derive(Debug, Default)]
pub struct MockProvider;

impl CameraProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
