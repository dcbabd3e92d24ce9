//! Shared data types.

pub mod http;
pub mod job;
pub mod poll;

pub use http::{HttpConfig, HttpConfigBuilder};
pub use job::{JobHandle, JobStatus};
pub use poll::PollPolicy;
