//! Notification sink contract exposed to camera devices
//!
//! Devices deliver these from their own threads, concurrently with control
//! calls and with each other. Implementations must not assume a device is
//! still attached when a notification arrives.

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::telemetry::StreamStats;

/// Request-correlation metadata attached to capture notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureResultExtras {
    pub request_id: i32,
    pub burst_id: i32,
    pub frame_number: i64,
    pub partial_result_count: i32,
    /// Stream that failed, or -1 when the error is not stream-specific
    pub error_stream_id: i32,
    pub input_result: bool,
}

impl CaptureResultExtras {
    /// Extras for a single request/frame pair
    pub fn new(request_id: i32, frame_number: i64) -> Self {
        Self {
            request_id,
            frame_number,
            ..Self::default()
        }
    }
}

impl Default for CaptureResultExtras {
    fn default() -> Self {
        Self {
            request_id: -1,
            burst_id: -1,
            frame_number: -1,
            partial_result_count: 0,
            error_stream_id: -1,
            input_result: false,
        }
    }
}

/// Error codes reported by the device driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceErrorCode {
    Disconnected,
    Device,
    Request,
    Result,
    Buffer,
    Invalid,
    Unknown(i32),
}

impl DeviceErrorCode {
    /// Map a raw driver code
    pub fn from_raw(code: i32) -> Self {
        match code {
            0 => Self::Disconnected,
            1 => Self::Device,
            3 => Self::Request,
            4 => Self::Result,
            5 => Self::Buffer,
            -1 => Self::Invalid,
            other => Self::Unknown(other),
        }
    }

    /// Whether the error ends the device session
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Disconnected | Self::Device)
    }
}

/// Recipient of asynchronous device events
pub trait NotificationListener: Send + Sync {
    fn notify_error(&self, code: DeviceErrorCode, extras: &CaptureResultExtras);

    fn notify_shutter(&self, extras: &CaptureResultExtras, timestamp_ns: i64);

    fn notify_auto_focus(&self, new_state: u8, trigger_id: i32);

    fn notify_auto_exposure(&self, new_state: u8, trigger_id: i32);

    fn notify_auto_whitebalance(&self, new_state: u8, trigger_id: i32);

    fn notify_prepared(&self, stream_id: i32);

    fn notify_request_queue_empty(&self);

    fn notify_repeating_request_error(&self, last_frame_number: i64);

    /// Device started streaming
    ///
    /// An error leaves the listener idle; the device may retry.
    fn notify_active(&self) -> Result<(), SessionError>;

    /// Device stopped streaming
    fn notify_idle(
        &self,
        request_count: i64,
        error_count: i64,
        device_error: bool,
        stream_stats: &[StreamStats],
    );
}
