//! Capabilities the hosting camera service provides to a session
//!
//! Each client kind supplies its own [`ClientOps`] at construction; the
//! session logic is shared and never generic over the client kind.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::OpsError;

/// Process-wide camera service
pub trait CameraService: Send + Sync {
    /// Device version tag for `camera_id`
    fn device_version(&self, camera_id: &str) -> i32;

    /// Snapshot diagnostics of all open sessions
    ///
    /// Takes the service lock. Sessions call it at most once, before their
    /// device is detached.
    fn cache_dump(&self);
}

/// Ops accounting around device and stream usage
pub trait ClientOps: Send + Sync {
    /// Begin device usage accounting; rejection aborts initialization
    fn start_camera_ops(&self) -> Result<(), OpsError>;

    /// End device usage accounting
    fn finish_camera_ops(&self) -> Result<(), OpsError>;

    /// Begin stream usage accounting on an idle to active edge
    fn start_streaming_ops(&self) -> Result<(), OpsError>;

    /// End stream usage accounting on an active to idle edge
    fn finish_streaming_ops(&self) -> Result<(), OpsError>;
}

/// Mock implementation of ClientOps for testing
///
/// Counts every accounting call; each `fail_*` scripts the next call of
/// that kind to be rejected.
#[derive(Default)]
pub struct MockOps {
    camera_starts: AtomicUsize,
    camera_finishes: AtomicUsize,
    streaming_starts: AtomicUsize,
    streaming_finishes: AtomicUsize,
    start_camera_result: Mutex<Option<OpsError>>,
    start_streaming_result: Mutex<Option<OpsError>>,
    finish_streaming_result: Mutex<Option<OpsError>>,
}

impl MockOps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn camera_starts(&self) -> usize {
        self.camera_starts.load(Ordering::SeqCst)
    }

    pub fn camera_finishes(&self) -> usize {
        self.camera_finishes.load(Ordering::SeqCst)
    }

    pub fn streaming_starts(&self) -> usize {
        self.streaming_starts.load(Ordering::SeqCst)
    }

    pub fn streaming_finishes(&self) -> usize {
        self.streaming_finishes.load(Ordering::SeqCst)
    }

    pub fn fail_start_camera(&self, error: OpsError) {
        *lock(&self.start_camera_result) = Some(error);
    }

    pub fn fail_start_streaming(&self, error: OpsError) {
        *lock(&self.start_streaming_result) = Some(error);
    }

    pub fn fail_finish_streaming(&self, error: OpsError) {
        *lock(&self.finish_streaming_result) = Some(error);
    }
}

impl ClientOps for MockOps {
    fn start_camera_ops(&self) -> Result<(), OpsError> {
        self.camera_starts.fetch_add(1, Ordering::SeqCst);
        scripted(&self.start_camera_result)
    }

    fn finish_camera_ops(&self) -> Result<(), OpsError> {
        self.camera_finishes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn start_streaming_ops(&self) -> Result<(), OpsError> {
        self.streaming_starts.fetch_add(1, Ordering::SeqCst);
        scripted(&self.start_streaming_result)
    }

    fn finish_streaming_ops(&self) -> Result<(), OpsError> {
        self.streaming_finishes.fetch_add(1, Ordering::SeqCst);
        scripted(&self.finish_streaming_result)
    }
}

/// Mock implementation of CameraService for testing
#[derive(Default)]
pub struct MockService {
    device_version: i32,
    cache_dumps: AtomicUsize,
}

impl MockService {
    pub fn new(device_version: i32) -> Self {
        Self {
            device_version,
            cache_dumps: AtomicUsize::new(0),
        }
    }

    /// Number of diagnostics snapshots taken
    pub fn cache_dump_count(&self) -> usize {
        self.cache_dumps.load(Ordering::SeqCst)
    }
}

impl CameraService for MockService {
    fn device_version(&self, _camera_id: &str) -> i32 {
        self.device_version
    }

    fn cache_dump(&self) {
        self.cache_dumps.fetch_add(1, Ordering::SeqCst);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn scripted(result: &Mutex<Option<OpsError>>) -> Result<(), OpsError> {
    match lock(result).take() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_ops_fail_once_then_recover() {
        let ops = MockOps::new();
        ops.fail_start_camera(OpsError::Status(-13));

        assert_eq!(ops.start_camera_ops(), Err(OpsError::Status(-13)));
        assert!(ops.start_camera_ops().is_ok());
        assert_eq!(ops.camera_starts(), 2);
    }

    #[test]
    fn mock_service_counts_cache_dumps() {
        let service = MockService::new(0x305);
        assert_eq!(service.device_version("0"), 0x305);
        service.cache_dump();
        assert_eq!(service.cache_dump_count(), 1);
    }
}
