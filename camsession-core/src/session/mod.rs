//! Client session management

pub mod client;
mod listener;
pub mod params;

// Re-export key types for convenience
pub use client::{ClientSession, SessionState};
pub use params::{ClientIdentity, ClientParams, SessionServices};
