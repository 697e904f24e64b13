//! Interface resource model
//!
//! This module provides:
//! - The desired specification and observed state of an interface resource
//! - State machine for the interface lifecycle

pub mod state;
pub mod types;

// Re-exports
pub use state::InterfaceInstance;
pub use types::{InterfaceSpec, InterfaceState};
