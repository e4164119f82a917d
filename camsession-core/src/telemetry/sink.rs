//! TelemetrySink trait definition

use tracing::info;

use super::TelemetryEvent;

/// Destination for usage telemetry
///
/// Logging is fire-and-forget: implementations must not block the caller
/// and have no way to report failure back.
pub trait TelemetrySink: Send + Sync {
    fn log(&self, event: TelemetryEvent);
}

/// Sink that writes events to the tracing log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTelemetry;

impl TelemetrySink for LogTelemetry {
    fn log(&self, event: TelemetryEvent) {
        match &event {
            TelemetryEvent::Active { camera_id, .. } => {
                info!(camera_id = %camera_id, "camera active");
            }
            TelemetryEvent::Idle {
                camera_id,
                request_count,
                error_count,
                device_error,
                stream_stats,
                ..
            } => {
                info!(
                    camera_id = %camera_id,
                    request_count,
                    error_count,
                    device_error,
                    streams = stream_stats.len(),
                    "camera idle"
                );
            }
        }
    }
}
