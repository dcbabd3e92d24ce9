//! Job queue operations on [`QueueClient`](crate::client::QueueClient).
//!
//! - `submit`: create a job
//! - `poll`: status checks and bounded poll sessions
//! - `fetch`: typed result retrieval
//! - `orchestrator`: submit, poll and fetch in one call
//! - `cancel`: provider-side cancellation

mod cancel;
mod fetch;
pub mod locator;
mod orchestrator;
mod poll;
mod submit;

pub use locator::{route, validate_locator};
