//! Built-in queue protocols.

#[cfg(feature = "fal")]
pub mod fal;
#[cfg(feature = "replicate")]
pub mod replicate;

#[cfg(feature = "fal")]
pub use fal::FalQueue;
#[cfg(feature = "replicate")]
pub use replicate::ReplicatePredictions;
