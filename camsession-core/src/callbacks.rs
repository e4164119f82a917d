//! Shared holder for the remote peer's callback target
//!
//! The remote peer's lifetime is managed by the transport, so the slot only
//! ever holds a shared reference. Every read goes through [`CallbackGuard`],
//! which keeps the slot locked for as long as it is alive; hold it only long
//! enough to copy out what you need.

use std::ops::Deref;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Remote peer that receives client notifications
pub trait RemoteCallback: Send + Sync {
    /// Stable identity of the remote object, used in dumps and logs
    fn callback_id(&self) -> String;
}

/// Mutex-guarded slot holding the current remote callback
#[derive(Default)]
pub struct CallbackSlot {
    inner: Mutex<Option<Arc<dyn RemoteCallback>>>,
}

impl CallbackSlot {
    /// Create a slot bound to `callback`
    pub fn new(callback: Option<Arc<dyn RemoteCallback>>) -> Self {
        Self {
            inner: Mutex::new(callback),
        }
    }

    /// Lock the slot and capture the current callback
    ///
    /// The lock is released when the guard is dropped.
    pub fn lock(&self) -> CallbackGuard<'_> {
        CallbackGuard {
            guard: self.inner.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }

    /// Replace the callback target
    pub fn assign(&self, callback: Option<Arc<dyn RemoteCallback>>) {
        let previous = {
            let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *guard, callback)
        };
        // Release the previous target outside the lock
        drop(previous);
    }

    /// Drop the callback target
    pub fn clear(&self) {
        self.assign(None);
    }

    /// Clone the current callback out of the slot
    pub fn get(&self) -> Option<Arc<dyn RemoteCallback>> {
        self.lock().clone()
    }
}

/// Scoped access to a [`CallbackSlot`]
pub struct CallbackGuard<'a> {
    guard: MutexGuard<'a, Option<Arc<dyn RemoteCallback>>>,
}

impl CallbackGuard<'_> {
    /// The captured callback, if any
    pub fn callback(&self) -> Option<&Arc<dyn RemoteCallback>> {
        self.guard.as_ref()
    }
}

impl Deref for CallbackGuard<'_> {
    type Target = Option<Arc<dyn RemoteCallback>>;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}
