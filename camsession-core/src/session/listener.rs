//! Device notification routing for client sessions
//!
//! Active and idle feed the activity tracker. Everything else is recorded
//! in the log only. Fatal device errors log at error level, request-scoped
//! ones as warnings.

use tracing::{error, trace, warn};

use super::client::ClientSession;
use crate::error::SessionError;
use crate::notify::{CaptureResultExtras, DeviceErrorCode, NotificationListener};
use crate::telemetry::StreamStats;

impl NotificationListener for ClientSession {
    fn notify_error(&self, code: DeviceErrorCode, extras: &CaptureResultExtras) {
        if code.is_fatal() {
            error!(
                "Camera {}: Error condition {:?} reported by HAL, requestId {}",
                self.camera_id(),
                code,
                extras.request_id
            );
        } else {
            warn!(
                "Camera {}: Error condition {:?} reported by HAL, requestId {}, frame {}",
                self.camera_id(),
                code,
                extras.request_id,
                extras.frame_number
            );
        }
    }

    fn notify_shutter(&self, extras: &CaptureResultExtras, timestamp_ns: i64) {
        trace!(
            "Camera {}: Shutter notification for request id {} at time {}",
            self.camera_id(),
            extras.request_id,
            timestamp_ns
        );
    }

    fn notify_auto_focus(&self, new_state: u8, trigger_id: i32) {
        trace!(
            "Camera {}: Autofocus state now {}, last trigger {}",
            self.camera_id(),
            new_state,
            trigger_id
        );
    }

    fn notify_auto_exposure(&self, new_state: u8, trigger_id: i32) {
        trace!(
            "Camera {}: Autoexposure state now {}, last trigger {}",
            self.camera_id(),
            new_state,
            trigger_id
        );
    }

    fn notify_auto_whitebalance(&self, new_state: u8, trigger_id: i32) {
        trace!(
            "Camera {}: Auto-whitebalance state now {}, last trigger {}",
            self.camera_id(),
            new_state,
            trigger_id
        );
    }

    fn notify_prepared(&self, stream_id: i32) {
        trace!(
            "Camera {}: Stream {} now prepared",
            self.camera_id(),
            stream_id
        );
    }

    fn notify_request_queue_empty(&self) {
        trace!("Camera {}: Request queue now empty", self.camera_id());
    }

    fn notify_repeating_request_error(&self, last_frame_number: i64) {
        trace!(
            "Camera {}: Repeating request was stopped. Last frame number is {}",
            self.camera_id(),
            last_frame_number
        );
    }

    fn notify_active(&self) -> Result<(), SessionError> {
        self.activity.notify_active()
    }

    fn notify_idle(
        &self,
        request_count: i64,
        error_count: i64,
        device_error: bool,
        stream_stats: &[StreamStats],
    ) {
        self.activity
            .notify_idle(request_count, error_count, device_error, stream_stats);
    }
}
