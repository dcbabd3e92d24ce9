//! Utility modules for relaykit

pub mod cancel;

pub use cancel::{CancelHandle, new_cancel_handle};
