//! camsession-core: client session core for exclusive camera devices
//!
//! This crate manages one remote client's session with a camera device:
//!
//! - **Sessions** - [`ClientSession`] owns the device, implements the
//!   connect/disconnect protocol and receives device notifications
//! - **Callback slot** - [`CallbackSlot`] guards the remote peer's callback
//! - **Permission guard** - [`PermissionGuard`] compares calling and owning pids
//! - **Activity tracking** - [`ActivityTracker`] turns active/idle edges into
//!   ops accounting and telemetry
//! - **Device contract** - [`CameraDevice`] and [`NotificationListener`]
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use camsession_core::device::{MockDeviceFactory, MockProvider};
//! use camsession_core::service::{MockOps, MockService};
//! use camsession_core::telemetry::LogTelemetry;
//! use camsession_core::{CallingContext, ClientParams, ClientSession, SessionServices};
//!
//! fn example() -> Result<(), camsession_core::SessionError> {
//!     let services = SessionServices {
//!         service: Arc::new(MockService::new(0x305)),
//!         ops: Arc::new(MockOps::new()),
//!         devices: Arc::new(MockDeviceFactory::new()),
//!         telemetry: Arc::new(LogTelemetry),
//!     };
//!     let params = ClientParams::new("0", "com.example.camera", 100, 10050).with_service_pid(5);
//!
//!     let session = ClientSession::new(params, None, services);
//!     session.initialize(&MockProvider, "")?;
//!     session.disconnect(&CallingContext::new(100, 10050))?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//!  remote peer ──control calls──▶ ClientSession ──▶ DeviceHandle ──▶ CameraDevice
//!                                   │     ▲                              │
//!                                   │     └─────── notifications ────────┘
//!                                   ▼         (weak registration)
//!                           ActivityTracker ──▶ ClientOps / TelemetrySink
//! ```

pub mod activity;
pub mod callbacks;
pub mod config;
pub mod context;
pub mod device;
pub mod error;
pub mod notify;
pub mod permission;
pub mod service;
pub mod session;
pub mod telemetry;

// Re-export key types for convenience
pub use activity::ActivityTracker;
pub use callbacks::{CallbackGuard, CallbackSlot, RemoteCallback};
pub use config::{DeviceOptions, LoggingConfig, SessionConfig};
pub use context::CallingContext;
pub use device::{CameraDevice, CameraProvider, DeviceFactory, DeviceHandle, DeviceSpec};
pub use error::{ConfigError, DeviceError, OpsError, SessionError};
pub use notify::{CaptureResultExtras, DeviceErrorCode, NotificationListener};
pub use permission::PermissionGuard;
pub use service::{CameraService, ClientOps};
pub use session::{ClientIdentity, ClientParams, ClientSession, SessionServices, SessionState};
pub use telemetry::{LogTelemetry, MemoryTelemetry, StreamStats, TelemetryEvent, TelemetrySink};
