//! Owning-process checks for per-client state

use std::sync::atomic::{AtomicI32, Ordering};

use tracing::error;

use crate::context::CallingContext;
use crate::error::SessionError;

/// Records the owning process of a session and gates calls on it
///
/// The owner is only rewritten by `connect`, which holds the session's
/// serialization lock; readers load it without that lock.
#[derive(Debug)]
pub struct PermissionGuard {
    owner_pid: AtomicI32,
}

impl PermissionGuard {
    /// Create a guard owned by `pid`
    pub fn new(pid: i32) -> Self {
        Self {
            owner_pid: AtomicI32::new(pid),
        }
    }

    /// Current owning pid
    pub fn owner(&self) -> i32 {
        self.owner_pid.load(Ordering::SeqCst)
    }

    /// Whether the caller is the owning process
    pub fn is_owner(&self, ctx: &CallingContext) -> bool {
        ctx.pid == self.owner()
    }

    /// Check that the caller owns the session
    ///
    /// `location` names the gated operation in the rejection and the log.
    pub fn check_pid(&self, ctx: &CallingContext, location: &str) -> Result<(), SessionError> {
        let owner = self.owner();
        if ctx.pid == owner {
            return Ok(());
        }

        error!(
            "{}: attempt to use a locked camera from a different process (old pid {}, new pid {})",
            location, owner, ctx.pid
        );
        Err(SessionError::PermissionDenied {
            location: location.to_string(),
            owner,
            caller: ctx.pid,
        })
    }

    /// Hand ownership to `pid`. Callers must hold the serialization lock.
    pub(crate) fn rebind(&self, pid: i32) {
        self.owner_pid.store(pid, Ordering::SeqCst);
    }
}
