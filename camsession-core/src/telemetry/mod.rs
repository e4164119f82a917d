//! Usage telemetry for camera activity

pub mod memory;
pub mod sink;
pub mod types;

pub use memory::MemoryTelemetry;
pub use sink::{LogTelemetry, TelemetrySink};
pub use types::{StreamStats, TelemetryEvent};
