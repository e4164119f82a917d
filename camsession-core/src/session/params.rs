//! Construction parameters and recorded identity of a client session

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::DeviceOptions;
use crate::device::DeviceFactory;
use crate::service::{CameraService, ClientOps};
use crate::telemetry::TelemetrySink;

/// Parameters supplied by the service layer once it has admitted a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientParams {
    pub camera_id: String,
    /// Numeric id used by the legacy api1 surface
    pub api1_camera_id: i32,
    pub package_name: String,
    pub feature_id: Option<String>,
    pub camera_facing: i32,
    pub sensor_orientation: i32,
    pub client_pid: i32,
    pub client_uid: u32,
    pub service_pid: i32,
    pub device: DeviceOptions,
}

impl ClientParams {
    /// Parameters for `package_name` in process `client_pid` opening `camera_id`
    pub fn new(
        camera_id: impl Into<String>,
        package_name: impl Into<String>,
        client_pid: i32,
        client_uid: u32,
    ) -> Self {
        Self {
            camera_id: camera_id.into(),
            api1_camera_id: -1,
            package_name: package_name.into(),
            feature_id: None,
            camera_facing: 0,
            sensor_orientation: 0,
            client_pid,
            client_uid,
            service_pid: 0,
            device: DeviceOptions::default(),
        }
    }

    pub fn with_service_pid(mut self, pid: i32) -> Self {
        self.service_pid = pid;
        self
    }

    pub fn with_api1_camera_id(mut self, id: i32) -> Self {
        self.api1_camera_id = id;
        self
    }

    pub fn with_feature_id(mut self, feature_id: impl Into<String>) -> Self {
        self.feature_id = Some(feature_id.into());
        self
    }

    pub fn with_orientation(mut self, facing: i32, sensor_orientation: i32) -> Self {
        self.camera_facing = facing;
        self.sensor_orientation = sensor_orientation;
        self
    }

    pub fn with_device_options(mut self, device: DeviceOptions) -> Self {
        self.device = device;
        self
    }
}

/// Identity recorded at construction; never changes afterwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub camera_id: String,
    pub api1_camera_id: i32,
    pub package_name: String,
    pub feature_id: Option<String>,
    pub camera_facing: i32,
    pub sensor_orientation: i32,
    pub client_uid: u32,
    pub service_pid: i32,
    /// Owning pid at open time, kept for the close log
    pub initial_client_pid: i32,
}

impl From<&ClientParams> for ClientIdentity {
    fn from(params: &ClientParams) -> Self {
        Self {
            camera_id: params.camera_id.clone(),
            api1_camera_id: params.api1_camera_id,
            package_name: params.package_name.clone(),
            feature_id: params.feature_id.clone(),
            camera_facing: params.camera_facing,
            sensor_orientation: params.sensor_orientation,
            client_uid: params.client_uid,
            service_pid: params.service_pid,
            initial_client_pid: params.client_pid,
        }
    }
}

/// Collaborators a session is wired to
#[derive(Clone)]
pub struct SessionServices {
    pub service: Arc<dyn CameraService>,
    pub ops: Arc<dyn ClientOps>,
    pub devices: Arc<dyn DeviceFactory>,
    pub telemetry: Arc<dyn TelemetrySink>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_fill_optional_fields() {
        let params = ClientParams::new("0", "com.example.cam", 100, 10050)
            .with_service_pid(5)
            .with_api1_camera_id(0)
            .with_feature_id("attribution")
            .with_orientation(1, 270);

        assert_eq!(params.service_pid, 5);
        assert_eq!(params.api1_camera_id, 0);
        assert_eq!(params.feature_id.as_deref(), Some("attribution"));
        assert_eq!(params.camera_facing, 1);
        assert_eq!(params.sensor_orientation, 270);
    }

    #[test]
    fn identity_records_initial_pid() {
        let params = ClientParams::new("1", "pkg", 321, 1);
        let identity = ClientIdentity::from(&params);
        assert_eq!(identity.initial_client_pid, 321);
        assert_eq!(identity.camera_id, "1");
    }
}
