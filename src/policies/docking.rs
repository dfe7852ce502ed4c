//! # Docking policy: how an actor behaves when the station is contended.
//!
//! The station's composite transaction (slot + two reservoir operations)
//! admits two safe strategies, and [`DockingPolicy`] selects between them:
//!
//! - [`DockingPolicy::HoldAndWait`] — acquire the slot, then block on each
//!   reservoir operation while holding it. No cross-resource deadlock is
//!   possible (reservoirs are never held while waiting on the slot pool), but
//!   an actor waiting out a fuel shortage occupies its slot the whole time,
//!   reducing dock throughput under reservoir contention.
//! - [`DockingPolicy::RequeueOnContention`] — use the non-blocking surface:
//!   if the slot or a reservoir operation would wait, release everything held,
//!   back off, and retry the transaction from the top. Dock access is never
//!   starved by one actor's fuel wait; the cost is retry traffic under load.
//!
//! Reservoir operations already applied before a requeue are not repeated:
//! the two per-kind operations are independent and individually atomic, so a
//! transaction completes kind-by-kind across retries.

use crate::policies::BackoffPolicy;

/// Strategy for the dock → transact → undock cycle under contention.
#[derive(Clone, Copy, Debug)]
pub enum DockingPolicy {
    /// Hold the docking slot across blocking reservoir waits.
    HoldAndWait,

    /// Never wait while holding the slot: release and retry after a backoff
    /// delay whenever a step would block.
    RequeueOnContention {
        /// Delay schedule between retries.
        backoff: BackoffPolicy,
    },
}

impl Default for DockingPolicy {
    /// Returns [`DockingPolicy::HoldAndWait`], the simplest safe strategy.
    fn default() -> Self {
        DockingPolicy::HoldAndWait
    }
}

impl DockingPolicy {
    /// Returns a short stable label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            DockingPolicy::HoldAndWait => "hold_and_wait",
            DockingPolicy::RequeueOnContention { .. } => "requeue_on_contention",
        }
    }
}
