//! Error Handling Module
//!
//! This module provides the error type shared by every layer of the client:
//! - Core error type (`RelayError`) and the `ErrorEnvelope` carried by HTTP failures
//! - Classification helpers (retryability, status codes)
//! - Conversions from the transport and codec error types
//!
//! # Example
//!
//! ```rust
//! use relaykit::error::{ErrorEnvelope, RelayError};
//!
//! let error = RelayError::UnsuccessfulRequest(ErrorEnvelope::new(503, "busy"));
//! assert_eq!(error.status_code(), Some(503));
//! assert!(error.is_retryable());
//! ```

mod conversions;
pub mod helpers;
pub mod types;

pub use types::*;
