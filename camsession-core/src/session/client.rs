//! Client session lifecycle
//!
//! A ClientSession binds one remote peer to one exclusively owned camera
//! device. Three kinds of thread touch it concurrently:
//!
//! - control calls from the remote peer (`connect`, `disconnect`, ...)
//! - notification delivery from the device's own threads
//! - whoever drops the last reference
//!
//! `connect` and `disconnect` are serialized by one session-wide lock. The
//! callback slot, the device holder and the activity tracker each have their
//! own finer lock, so notification delivery never waits on a control call.
//! Only the serialization lock is held across `CameraDevice::disconnect`;
//! notification paths never take it.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tracing::{debug, error, info, warn};

use super::params::{ClientIdentity, ClientParams, SessionServices};
use crate::activity::ActivityTracker;
use crate::callbacks::{CallbackSlot, RemoteCallback};
use crate::context::CallingContext;
use crate::device::{CameraProvider, DeviceHandle};
use crate::error::SessionError;
use crate::notify::NotificationListener;
use crate::permission::PermissionGuard;

/// Session state as seen from the control path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Bound to a remote callback, device attached
    Bound,
    /// Torn down; terminal
    Disconnected,
}

/// One remote client's session with a camera device
pub struct ClientSession {
    identity: ClientIdentity,
    device_version: i32,
    services: SessionServices,
    permission: PermissionGuard,
    callbacks: CallbackSlot,
    device: DeviceHandle,
    pub(super) activity: ActivityTracker,
    serialization: Mutex<()>,
    camera_ops_active: AtomicBool,
    disconnected: AtomicBool,
    destruction_started: AtomicBool,
}

impl ClientSession {
    /// Open a session for an admitted client
    ///
    /// # Panics
    ///
    /// Panics if the device factory produces no device. The service layer
    /// only opens sessions for cameras it has already resolved, so this is
    /// an environment invariant violation rather than a recoverable error.
    pub fn new(
        params: ClientParams,
        remote_callback: Option<Arc<dyn RemoteCallback>>,
        services: SessionServices,
    ) -> Arc<Self> {
        let identity = ClientIdentity::from(&params);
        let device_version = services.service.device_version(&identity.camera_id);

        let spec = params.device.spec(identity.camera_id.clone());
        let Some(device) = services.devices.create(&spec) else {
            panic!(
                "Camera {}: device should never be absent here",
                identity.camera_id
            );
        };

        info!(
            "Camera {}: Opened. Client: {} (PID {}, UID {})",
            identity.camera_id, identity.package_name, params.client_pid, identity.client_uid
        );

        let activity = ActivityTracker::new(
            identity.camera_id.clone(),
            Arc::clone(&services.ops),
            Arc::clone(&services.telemetry),
        );

        Arc::new(Self {
            device_version,
            permission: PermissionGuard::new(params.client_pid),
            callbacks: CallbackSlot::new(remote_callback),
            device: DeviceHandle::new(device),
            activity,
            serialization: Mutex::new(()),
            camera_ops_active: AtomicBool::new(false),
            disconnected: AtomicBool::new(false),
            destruction_started: AtomicBool::new(false),
            services,
            identity,
        })
    }

    /// Bind the session to the provider layer
    ///
    /// Starts camera ops accounting, initializes the device, and registers
    /// this session as the device's notification sink. Failures are
    /// returned unchanged and leave nothing registered. Camera ops started
    /// here stay balanced: a session with no device finishes them at once,
    /// otherwise disconnect finishes them.
    pub fn initialize(
        self: &Arc<Self>,
        provider: &dyn CameraProvider,
        monitor_tags: &str,
    ) -> Result<(), SessionError> {
        debug!("Camera {}: Initializing client", self.identity.camera_id);

        self.start_camera_ops()?;

        let Some(device) = self.device.current() else {
            error!("Camera {}: No device connected", self.identity.camera_id);
            self.finish_camera_ops();
            return Err(SessionError::NotInitialized);
        };

        if let Err(e) = device.initialize(provider, monitor_tags) {
            error!(
                "Camera {}: unable to initialize device: {}",
                self.identity.camera_id, e
            );
            return Err(e.into());
        }

        let weak: Weak<ClientSession> = Arc::downgrade(self);
        let listener: Weak<dyn NotificationListener> = weak;
        if let Err(e) = device.set_notify_callback(listener) {
            warn!(
                "Camera {}: unable to register for device notifications: {}",
                self.identity.camera_id, e
            );
        }

        Ok(())
    }

    /// Rebind the session to a new remote callback
    ///
    /// Rejected with [`SessionError::AlreadyOwned`] when another process
    /// owns the session; nothing changes in that case.
    pub fn connect(
        &self,
        ctx: &CallingContext,
        callback: Arc<dyn RemoteCallback>,
    ) -> Result<(), SessionError> {
        let _serial = self.serialize();

        let owner = self.permission.owner();
        if owner != 0 && ctx.pid != owner {
            error!(
                "Camera {}: Connection attempt from pid {}; current locked to pid {}",
                self.identity.camera_id, ctx.pid, owner
            );
            return Err(SessionError::AlreadyOwned {
                owner,
                caller: ctx.pid,
            });
        }

        self.permission.rebind(ctx.pid);
        self.callbacks.assign(Some(callback));

        Ok(())
    }

    /// Tear the session down
    ///
    /// Only the owning process and the hosting service may disconnect; calls
    /// from anyone else are ignored. Repeated calls are no-ops.
    pub fn disconnect(&self, ctx: &CallingContext) -> Result<(), SessionError> {
        let _serial = self.serialize();

        if !self.permission.is_owner(ctx) && ctx.pid != self.identity.service_pid {
            return Ok(());
        }

        debug!("Camera {}: Shutting down", self.identity.camera_id);

        // Snapshot before detaching. Once disconnected the service may be
        // holding its own lock while it reaps this session.
        if !self.is_disconnected() {
            self.services.service.cache_dump();
        }

        self.detach_device();
        self.release();

        debug!("Camera {}: Shut down complete", self.identity.camera_id);
        Ok(())
    }

    /// Check that the caller owns the session
    pub fn check_pid(&self, ctx: &CallingContext, location: &str) -> Result<(), SessionError> {
        self.permission.check_pid(ctx, location)
    }

    /// Write a diagnostic summary followed by the device's own dump
    ///
    /// Device dump failures are written into the output; only writer
    /// errors are returned.
    pub fn dump(&self, out: &mut dyn Write, args: &[String]) -> io::Result<()> {
        let callback = self.callbacks.get().map(|cb| cb.callback_id());

        writeln!(
            out,
            "ClientSession[{}] ({}) PID: {}, dump:",
            self.identity.camera_id,
            callback.as_deref().unwrap_or("none"),
            self.permission.owner()
        )?;
        let activity = if self.is_device_active() {
            "active"
        } else {
            "idle"
        };
        let suffix = if self.is_disconnected() {
            ", disconnected"
        } else {
            ""
        };
        writeln!(out, "  State: {}{}", activity, suffix)?;

        self.dump_device(out, args)
    }

    fn dump_device(&self, out: &mut dyn Write, args: &[String]) -> io::Result<()> {
        writeln!(out, "  Device dump:")?;

        let Some(device) = self.device.current() else {
            writeln!(out, "  *** Device is detached")?;
            return Ok(());
        };

        if let Err(e) = device.dump(out, args) {
            writeln!(out, "   Error dumping device: {}", e)?;
        }
        Ok(())
    }

    fn detach_device(&self) {
        if self.device.detach() {
            debug!("Camera {}: Detach complete", self.identity.camera_id);
        }
    }

    /// Base-client teardown, run once
    fn release(&self) {
        if self.disconnected.swap(true, Ordering::SeqCst) {
            return;
        }

        self.activity.close();
        self.finish_camera_ops();
        self.callbacks.clear();
    }

    fn start_camera_ops(&self) -> Result<(), SessionError> {
        if self.camera_ops_active.load(Ordering::SeqCst) {
            return Ok(());
        }
        self.services.ops.start_camera_ops()?;
        self.camera_ops_active.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn finish_camera_ops(&self) {
        if !self.camera_ops_active.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Err(e) = self.services.ops.finish_camera_ops() {
            warn!(
                "Camera {}: Error finishing camera ops: {}",
                self.identity.camera_id, e
            );
        }
    }

    fn serialize(&self) -> std::sync::MutexGuard<'_, ()> {
        self.serialization
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> SessionState {
        if self.is_disconnected() {
            SessionState::Disconnected
        } else {
            SessionState::Bound
        }
    }

    pub fn camera_id(&self) -> &str {
        &self.identity.camera_id
    }

    pub fn api1_camera_id(&self) -> i32 {
        self.identity.api1_camera_id
    }

    pub fn device_version(&self) -> i32 {
        self.device_version
    }

    pub fn package_name(&self) -> &str {
        &self.identity.package_name
    }

    pub fn identity(&self) -> &ClientIdentity {
        &self.identity
    }

    /// Current owning pid
    pub fn client_pid(&self) -> i32 {
        self.permission.owner()
    }

    pub fn client_uid(&self) -> u32 {
        self.identity.client_uid
    }

    pub fn service_pid(&self) -> i32 {
        self.identity.service_pid
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected.load(Ordering::SeqCst)
    }

    pub fn is_device_attached(&self) -> bool {
        self.device.is_attached()
    }

    pub fn is_device_active(&self) -> bool {
        self.activity.is_active()
    }

    pub fn destruction_started(&self) -> bool {
        self.destruction_started.load(Ordering::SeqCst)
    }

    /// The current remote callback
    pub fn remote_callback(&self) -> Option<Arc<dyn RemoteCallback>> {
        self.callbacks.get()
    }

    /// The callback slot, for notification paths that deliver to the peer
    pub fn callbacks(&self) -> &CallbackSlot {
        &self.callbacks
    }
}

impl Drop for ClientSession {
    fn drop(&mut self) {
        self.destruction_started.store(true, Ordering::SeqCst);

        let ctx = CallingContext::service(self.identity.service_pid);
        if let Err(e) = self.disconnect(&ctx) {
            error!(
                "Camera {}: disconnect during teardown failed: {}",
                self.identity.camera_id, e
            );
        }

        info!(
            "Closed Camera {}. Client was: {} (PID {}, UID {})",
            self.identity.camera_id,
            self.identity.package_name,
            self.identity.initial_client_pid,
            self.identity.client_uid
        );
    }
}
