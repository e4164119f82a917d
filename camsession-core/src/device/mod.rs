//! Camera device abstraction

pub mod handle;
pub mod mock;
pub mod slow_mock;
pub mod traits;

// Re-export key types for convenience
pub use handle::DeviceHandle;
pub use mock::{MockDevice, MockDeviceFactory, MockDeviceProbe, MockProvider};
pub use slow_mock::SlowMockDevice;
pub use traits::{CameraDevice, CameraProvider, DeviceFactory, DeviceSpec};
