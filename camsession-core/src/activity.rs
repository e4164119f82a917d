//! Device active/idle tracking
//!
//! Streaming ops accounting and usage telemetry fire only on edges. The
//! whole edge (check, accounting, telemetry, store) runs under the tracker's
//! lock, so concurrent notifications from several driver threads count each
//! transition exactly once.
//!
//! A tracker is closed when its session disconnects. Closing an active
//! tracker finishes streaming ops at once but leaves the idle event pending
//! until the device reports its counters. Active reports after close are
//! dropped so a detached device is never counted as active.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, warn};

use crate::error::SessionError;
use crate::service::ClientOps;
use crate::telemetry::{StreamStats, TelemetryEvent, TelemetrySink};

#[derive(Debug, Default)]
struct ActivityState {
    active: bool,
    closed: bool,
    /// Closed while active; the next idle report carries the counters
    pending_idle: bool,
}

pub struct ActivityTracker {
    camera_id: String,
    ops: Arc<dyn ClientOps>,
    telemetry: Arc<dyn TelemetrySink>,
    state: Mutex<ActivityState>,
}

impl ActivityTracker {
    pub fn new(
        camera_id: impl Into<String>,
        ops: Arc<dyn ClientOps>,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Self {
        Self {
            camera_id: camera_id.into(),
            ops,
            telemetry,
            state: Mutex::new(ActivityState::default()),
        }
    }

    pub fn is_active(&self) -> bool {
        self.lock().active
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Whether an idle event is still owed for activity cut short by close
    pub fn has_pending_idle(&self) -> bool {
        self.lock().pending_idle
    }

    /// Handle the device starting to stream
    ///
    /// If streaming ops are rejected the tracker stays idle and the error is
    /// returned for the device to retry.
    pub fn notify_active(&self) -> Result<(), SessionError> {
        let mut state = self.lock();
        if state.closed {
            debug!(
                "Camera {}: dropping active notification after disconnect",
                self.camera_id
            );
            return Ok(());
        }

        if !state.active {
            if let Err(e) = self.ops.start_streaming_ops() {
                error!(
                    "Camera {}: Error starting camera streaming ops: {}",
                    self.camera_id, e
                );
                return Err(e.into());
            }
            self.telemetry.log(TelemetryEvent::active(&self.camera_id));
        }
        state.active = true;

        debug!("Camera {}: device is now active", self.camera_id);
        Ok(())
    }

    /// Handle the device going idle
    pub fn notify_idle(
        &self,
        request_count: i64,
        error_count: i64,
        device_error: bool,
        stream_stats: &[StreamStats],
    ) {
        let mut state = self.lock();
        let was_active = state.active;
        if was_active {
            self.finish_streaming();
        }

        if was_active || state.pending_idle {
            self.telemetry.log(TelemetryEvent::idle(
                &self.camera_id,
                request_count,
                error_count,
                device_error,
                stream_stats,
            ));
        }
        state.active = false;
        state.pending_idle = false;

        debug!("Camera {}: device is now idle", self.camera_id);
    }

    /// Stop tracking
    ///
    /// An active device has its streaming ops finished here; its idle event
    /// waits for the device's own idle report.
    pub fn close(&self) {
        let mut state = self.lock();
        if state.closed {
            return;
        }

        if state.active {
            self.finish_streaming();
            state.active = false;
            state.pending_idle = true;
        }
        state.closed = true;
    }

    fn finish_streaming(&self) {
        if let Err(e) = self.ops.finish_streaming_ops() {
            warn!(
                "Camera {}: Error finishing streaming ops: {}",
                self.camera_id, e
            );
        }
    }

    fn lock(&self) -> MutexGuard<'_, ActivityState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
