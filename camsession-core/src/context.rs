//! Calling identity for control-path operations
//!
//! The RPC dispatch layer resolves who is calling and hands it to every
//! control call explicitly, so identity checks never consult ambient state.

use serde::{Deserialize, Serialize};

/// Process and user identity of the caller of a control operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallingContext {
    /// Calling process id
    pub pid: i32,
    /// Calling user id
    pub uid: u32,
}

impl CallingContext {
    /// Create a context for the given pid and uid
    pub fn new(pid: i32, uid: u32) -> Self {
        Self { pid, uid }
    }

    /// Context for a call issued by the hosting service process itself
    pub fn service(pid: i32) -> Self {
        Self { pid, uid: 0 }
    }
}
