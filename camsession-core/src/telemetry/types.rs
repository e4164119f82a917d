//! Telemetry event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-stream statistics reported when a device goes idle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamStats {
    pub stream_id: i32,
    pub width: u32,
    pub height: u32,
    pub format: i32,
    pub data_space: i32,
    pub usage: u64,
    /// Requests that targeted this stream
    pub request_count: i64,
    /// Buffers that failed for this stream
    pub error_count: i64,
    /// Milliseconds from configuration to first frame
    pub startup_latency_ms: i32,
    pub max_hal_buffers: i32,
    pub max_app_buffers: i32,
}

impl StreamStats {
    /// Create stats for a stream of the given size
    pub fn new(stream_id: i32, width: u32, height: u32) -> Self {
        Self {
            stream_id,
            width,
            height,
            ..Self::default()
        }
    }
}

/// Usage telemetry emitted on device activity edges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// Device went from idle to active
    Active {
        camera_id: String,
        at: DateTime<Utc>,
    },
    /// Device went from active to idle
    Idle {
        camera_id: String,
        request_count: i64,
        error_count: i64,
        device_error: bool,
        stream_stats: Vec<StreamStats>,
        at: DateTime<Utc>,
    },
}

impl TelemetryEvent {
    /// Active event stamped now
    pub fn active(camera_id: impl Into<String>) -> Self {
        Self::Active {
            camera_id: camera_id.into(),
            at: Utc::now(),
        }
    }

    /// Idle event stamped now
    pub fn idle(
        camera_id: impl Into<String>,
        request_count: i64,
        error_count: i64,
        device_error: bool,
        stream_stats: &[StreamStats],
    ) -> Self {
        Self::Idle {
            camera_id: camera_id.into(),
            request_count,
            error_count,
            device_error,
            stream_stats: stream_stats.to_vec(),
            at: Utc::now(),
        }
    }

    /// Camera the event belongs to
    pub fn camera_id(&self) -> &str {
        match self {
            Self::Active { camera_id, .. } | Self::Idle { camera_id, .. } => camera_id,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle { .. })
    }
}
