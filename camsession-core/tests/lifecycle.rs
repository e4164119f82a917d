//! End-to-end session lifecycle tests
//!
//! These drive a session the way the service layer and a driver thread
//! would: open, initialize, stream, rebind, tear down.

use std::sync::Arc;
use std::time::Duration;

use camsession_core::device::{MockDeviceFactory, MockDeviceProbe, MockProvider};
use camsession_core::service::{MockOps, MockService};
use camsession_core::{
    CallingContext, CaptureResultExtras, ClientParams, ClientSession, DeviceErrorCode,
    MemoryTelemetry, NotificationListener, OpsError, RemoteCallback, SessionError,
    SessionServices, SessionState, StreamStats, TelemetryEvent,
};

const OWNER_PID: i32 = 4100;
const SERVICE_PID: i32 = 1000;

struct PeerCallback(String);

impl RemoteCallback for PeerCallback {
    fn callback_id(&self) -> String {
        self.0.clone()
    }
}

struct Fixture {
    service: Arc<MockService>,
    ops: Arc<MockOps>,
    devices: Arc<MockDeviceFactory>,
    telemetry: Arc<MemoryTelemetry>,
    session: Arc<ClientSession>,
}

impl Fixture {
    fn open() -> Self {
        let service = Arc::new(MockService::new(0x304));
        let ops = Arc::new(MockOps::new());
        let devices = Arc::new(MockDeviceFactory::new());
        let telemetry = Arc::new(MemoryTelemetry::new(64));

        let services = SessionServices {
            service: service.clone(),
            ops: ops.clone(),
            devices: devices.clone(),
            telemetry: telemetry.clone(),
        };
        let params = ClientParams::new("1", "com.example.viewfinder", OWNER_PID, 10077)
            .with_service_pid(SERVICE_PID)
            .with_orientation(1, 270);
        let callback: Arc<dyn RemoteCallback> = Arc::new(PeerCallback("viewfinder".into()));
        let session = ClientSession::new(params, Some(callback), services);

        Self {
            service,
            ops,
            devices,
            telemetry,
            session,
        }
    }

    fn probe(&self) -> Arc<MockDeviceProbe> {
        self.devices.last_probe().unwrap()
    }
}

fn owner() -> CallingContext {
    CallingContext::new(OWNER_PID, 10077)
}

#[test]
fn full_session_lifecycle() {
    let fx = Fixture::open();
    fx.session.initialize(&MockProvider, "+3a -hdr").unwrap();

    let driver = fx.probe().listener().expect("listener registered");
    driver.notify_active().unwrap();
    driver.notify_shutter(&CaptureResultExtras::new(7, 42), 1_000_000);
    driver.notify_idle(12, 1, false, &[StreamStats::new(0, 1920, 1080)]);

    assert_eq!(fx.session.state(), SessionState::Bound);
    drop(driver);

    fx.session.disconnect(&owner()).unwrap();

    assert_eq!(fx.session.state(), SessionState::Disconnected);
    assert_eq!(fx.ops.camera_starts(), 1);
    assert_eq!(fx.ops.camera_finishes(), 1);
    assert_eq!(fx.ops.streaming_starts(), 1);
    assert_eq!(fx.ops.streaming_finishes(), 1);
    assert_eq!(fx.service.cache_dump_count(), 1);

    let events = fx.telemetry.events();
    assert_eq!(events.len(), 2);
    assert!(events[0].is_active());
    match &events[1] {
        TelemetryEvent::Idle {
            camera_id,
            request_count,
            error_count,
            stream_stats,
            ..
        } => {
            assert_eq!(camera_id, "1");
            assert_eq!(*request_count, 12);
            assert_eq!(*error_count, 1);
            assert_eq!(stream_stats.len(), 1);
        }
        other => panic!("expected idle event, got {:?}", other),
    }
}

#[test]
fn streaming_rejection_is_retried_by_device() {
    let fx = Fixture::open();
    fx.session.initialize(&MockProvider, "").unwrap();
    fx.ops.fail_start_streaming(OpsError::Unavailable);

    let driver = fx.probe().listener().unwrap();
    assert!(matches!(
        driver.notify_active(),
        Err(SessionError::Ops(OpsError::Unavailable))
    ));
    assert!(!fx.session.is_device_active());
    assert_eq!(fx.telemetry.active_count(), 0);

    driver.notify_active().unwrap();
    assert!(fx.session.is_device_active());
    assert_eq!(fx.telemetry.active_count(), 1);
}

#[test]
fn idle_reported_after_disconnect_keeps_device_counters() {
    let fx = Fixture::open();
    fx.session.initialize(&MockProvider, "").unwrap();
    let driver = fx.probe().listener().unwrap();
    driver.notify_active().unwrap();

    fx.session.disconnect(&owner()).unwrap();
    assert_eq!(fx.ops.streaming_finishes(), 1);

    driver.notify_idle(12, 3, true, &[StreamStats::new(2, 640, 480)]);

    let events = fx.telemetry.events();
    assert_eq!(events.len(), 2);
    match &events[1] {
        TelemetryEvent::Idle {
            request_count,
            error_count,
            device_error,
            stream_stats,
            ..
        } => {
            assert_eq!(*request_count, 12);
            assert_eq!(*error_count, 3);
            assert!(*device_error);
            assert_eq!(stream_stats.len(), 1);
        }
        other => panic!("expected idle event, got {:?}", other),
    }
    assert_eq!(fx.ops.streaming_finishes(), 1);
}

#[test]
fn diagnostics_notifications_leave_state_alone() {
    let fx = Fixture::open();
    fx.session.initialize(&MockProvider, "").unwrap();
    let driver = fx.probe().listener().unwrap();

    driver.notify_error(DeviceErrorCode::Request, &CaptureResultExtras::new(3, 9));
    driver.notify_auto_focus(2, 11);
    driver.notify_auto_exposure(1, 12);
    driver.notify_auto_whitebalance(3, 13);
    driver.notify_prepared(0);
    driver.notify_request_queue_empty();
    driver.notify_repeating_request_error(99);

    assert!(!fx.session.is_device_active());
    assert!(fx.telemetry.events().is_empty());
    assert_eq!(fx.session.state(), SessionState::Bound);
}

#[test]
fn rebind_then_teardown_by_service() {
    let fx = Fixture::open();
    fx.session.initialize(&MockProvider, "").unwrap();

    let replacement: Arc<dyn RemoteCallback> = Arc::new(PeerCallback("reopened".into()));
    fx.session.connect(&owner(), replacement).unwrap();

    let mut out = Vec::new();
    fx.session.dump(&mut out, &[]).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("(reopened)"));
    assert!(text.contains("Mock device 1"));

    fx.session
        .disconnect(&CallingContext::service(SERVICE_PID))
        .unwrap();
    assert!(fx.probe().is_disconnected());

    // A stale owner call after service teardown changes nothing
    fx.session.disconnect(&owner()).unwrap();
    assert_eq!(fx.probe().disconnect_count(), 1);
    assert_eq!(fx.service.cache_dump_count(), 1);
}

#[test]
fn dropping_last_reference_tears_down() {
    let Fixture {
        session,
        devices,
        ops,
        ..
    } = Fixture::open();
    session.initialize(&MockProvider, "").unwrap();
    session.notify_active().unwrap();
    let probe = devices.last_probe().unwrap();

    drop(session);

    assert!(probe.is_disconnected());
    assert!(probe.listener().is_none());
    assert_eq!(ops.streaming_finishes(), 1);
    assert_eq!(ops.camera_finishes(), 1);
}

#[tokio::test]
async fn telemetry_subscribers_see_edges() {
    let fx = Fixture::open();
    fx.session.initialize(&MockProvider, "").unwrap();
    let mut events = fx.telemetry.subscribe();

    let probe = fx.probe();
    let driver = std::thread::spawn(move || {
        if let Some(listener) = probe.listener() {
            listener.notify_active().unwrap();
            listener.notify_idle(3, 0, false, &[]);
        }
    });

    let first = tokio::time::timeout(Duration::from_secs(1), events.recv())
        .await
        .unwrap()
        .unwrap();
    let second = tokio::time::timeout(Duration::from_secs(1), events.recv())
        .await
        .unwrap()
        .unwrap();
    driver.join().unwrap();

    assert!(first.is_active());
    assert!(second.is_idle());
    assert_eq!(second.camera_id(), "1");
}
