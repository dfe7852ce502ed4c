//! Policies governing actor behavior: docking strategy, retry backoff,
//! jitter, and inter-transaction pacing.

mod backoff;
mod docking;
mod jitter;
mod pacing;

pub use backoff::BackoffPolicy;
pub use docking::DockingPolicy;
pub use jitter::JitterPolicy;
pub use pacing::PacePolicy;
