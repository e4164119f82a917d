//! Scripted session against a simulated device
//!
//! Opens a session, lets a driver thread stream `--frames` shutters through
//! the registered listener, then prints the session dump and every telemetry
//! event as a JSON line before disconnecting.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use anyhow::{Result, anyhow};
use camsession_core::device::{MockDeviceFactory, MockDeviceProbe, MockProvider};
use camsession_core::service::{MockOps, MockService};
use camsession_core::{
    CallingContext, CaptureResultExtras, ClientParams, ClientSession, DeviceErrorCode,
    MemoryTelemetry, RemoteCallback, SessionConfig, SessionError, SessionServices, StreamStats,
};
use chrono::Utc;
use clap::Args;
use tracing::info;

const PACKAGE_NAME: &str = "camsession.simulate";
const DEVICE_VERSION: i32 = 0x305;
const SIMULATED_UID: u32 = 10000;

#[derive(Args)]
pub struct SimulateArgs {
    /// Camera to open
    #[arg(long, default_value = "0")]
    pub camera_id: String,

    /// Pid the simulated client connects from
    #[arg(long, default_value_t = 4242)]
    pub pid: i32,

    /// Shutter notifications to deliver while streaming
    #[arg(long, default_value_t = 3)]
    pub frames: u32,

    /// Raw driver error code to report on the last frame
    #[arg(long, allow_hyphen_values = true)]
    pub error: Option<i32>,

    /// Use this config file instead of the layered configuration
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Driver-side script played against the registered listener
#[derive(Debug, Clone, Copy)]
struct Script {
    frames: u32,
    error: Option<DeviceErrorCode>,
}

struct ConsoleCallback;

impl RemoteCallback for ConsoleCallback {
    fn callback_id(&self) -> String {
        "console".to_string()
    }
}

pub fn run(args: SimulateArgs, config: &SessionConfig) -> Result<()> {
    let config = effective_config(&args, config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    simulate(&args, &config, &mut out)
}

/// `--config` replaces the layered configuration outright
fn effective_config(args: &SimulateArgs, layered: &SessionConfig) -> Result<SessionConfig> {
    match &args.config {
        Some(path) => Ok(SessionConfig::load(path)?),
        None => Ok(layered.clone()),
    }
}

fn simulate(args: &SimulateArgs, config: &SessionConfig, out: &mut dyn Write) -> Result<()> {
    let devices = Arc::new(MockDeviceFactory::new());
    let telemetry = Arc::new(MemoryTelemetry::default());
    let services = SessionServices {
        service: Arc::new(MockService::new(DEVICE_VERSION)),
        ops: Arc::new(MockOps::new()),
        devices: devices.clone(),
        telemetry: telemetry.clone(),
    };

    let params = ClientParams::new(&args.camera_id, PACKAGE_NAME, args.pid, SIMULATED_UID)
        .with_service_pid(config.service_pid)
        .with_device_options(config.device);
    let session = ClientSession::new(params, Some(Arc::new(ConsoleCallback)), services);
    session.initialize(&MockProvider, &config.monitor_tags_string())?;

    let probe = devices
        .last_probe()
        .ok_or_else(|| anyhow!("simulated device was not created"))?;
    let script = Script {
        frames: args.frames,
        error: args.error.map(DeviceErrorCode::from_raw),
    };
    let driver = thread::spawn(move || drive(&probe, script));
    driver
        .join()
        .map_err(|_| anyhow!("driver thread panicked"))??;

    session.dump(out, &[])?;
    for event in telemetry.events() {
        writeln!(out, "{}", serde_json::to_string(&event)?)?;
    }

    session.disconnect(&CallingContext::new(args.pid, SIMULATED_UID))?;
    info!(
        "Simulated {} frames on camera {}",
        args.frames, args.camera_id
    );
    Ok(())
}

/// Play the device's driver thread: active, shutters, idle
fn drive(probe: &MockDeviceProbe, script: Script) -> Result<(), SessionError> {
    let Some(listener) = probe.listener() else {
        return Ok(());
    };

    listener.notify_active()?;
    let mut last = CaptureResultExtras::default();
    for frame in 0..script.frames {
        last = CaptureResultExtras::new(frame as i32, i64::from(frame));
        let timestamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        listener.notify_shutter(&last, timestamp);
    }

    let errors = match script.error {
        Some(code) => {
            listener.notify_error(code, &last);
            1
        }
        None => 0,
    };
    let device_error = script.error.is_some_and(|code| code.is_fatal());
    listener.notify_idle(
        i64::from(script.frames),
        errors,
        device_error,
        &[StreamStats::new(0, 1920, 1080)],
    );
    Ok(())
}
