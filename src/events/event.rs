//! # Runtime events emitted by actors and the fleet.
//!
//! [`EventKind`] classifies events across three categories:
//! - **Actor lifecycle**: actor start/stop/failure.
//! - **Transaction flow**: docking, fuel transfer, undocking, dock retries.
//! - **Shutdown**: signal observed, grace outcome.
//!
//! The [`Event`] struct carries optional metadata such as the actor name, the
//! fuel kind and amount, the reservoir level after a transfer, and retry
//! delays.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::station::FuelKind;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of station events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Actor lifecycle ===
    /// Actor loop is starting.
    ///
    /// Sets: `actor`, `at`, `seq`.
    ActorStarting,

    /// Actor loop stopped gracefully (completed its rounds or was cancelled).
    ///
    /// Sets: `actor`, `at`, `seq`.
    ActorStopped,

    /// Actor loop aborted on a non-graceful error.
    ///
    /// Sets: `actor`, `reason`, `at`, `seq`.
    ActorFailed,

    // === Transaction flow ===
    /// Actor acquired a docking slot.
    ///
    /// Sets: `actor`, `berth`, `at`, `seq`.
    Docked,

    /// Actor released its docking slot.
    ///
    /// Sets: `actor`, `berth`, `at`, `seq`.
    Undocked,

    /// Fuel was drained from a reservoir.
    ///
    /// Sets: `actor`, `fuel`, `amount`, `level` (after the drain), `at`, `seq`.
    FuelDrained,

    /// Fuel was added to a reservoir.
    ///
    /// Sets: `actor`, `fuel`, `amount`, `level` (after the add), `at`, `seq`.
    FuelAdded,

    /// A contended transaction released its resources and scheduled a retry.
    ///
    /// Sets: `actor`, `attempt`, `delay_ms`, `at`, `seq`.
    DockRetryScheduled,

    // === Shutdown ===
    /// Shutdown requested (OS signal observed or run cancelled).
    ///
    /// Sets: `at`, `seq`.
    ShutdownRequested,

    /// All actors stopped within the configured grace period.
    ///
    /// Sets: `at`, `seq`.
    AllStoppedWithin,

    /// Grace period exceeded; some actors did not stop in time.
    ///
    /// Sets: `at`, `seq`.
    GraceExceeded,
}

/// Station event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the actor, if applicable.
    pub actor: Option<Arc<str>>,
    /// Fuel kind involved in a transfer.
    pub fuel: Option<FuelKind>,
    /// Amount of fuel transferred.
    pub amount: Option<u32>,
    /// Reservoir level observed after the transfer.
    pub level: Option<u32>,
    /// Berth number of the docking this event belongs to.
    pub berth: Option<u64>,
    /// Retry attempt count (starting from 0).
    pub attempt: Option<u32>,
    /// Retry delay before the next attempt in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Human-readable reason (errors, shutdown details).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp and
    /// next sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            actor: None,
            fuel: None,
            amount: None,
            level: None,
            berth: None,
            attempt: None,
            delay_ms: None,
            reason: None,
        }
    }

    /// Attaches an actor name.
    #[inline]
    pub fn with_actor(mut self, actor: impl Into<Arc<str>>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Attaches a fuel kind.
    #[inline]
    pub fn with_fuel(mut self, fuel: FuelKind) -> Self {
        self.fuel = Some(fuel);
        self
    }

    /// Attaches a transferred amount.
    #[inline]
    pub fn with_amount(mut self, amount: u32) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Attaches the reservoir level observed after the transfer.
    #[inline]
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }

    /// Attaches a berth number.
    #[inline]
    pub fn with_berth(mut self, berth: u64) -> Self {
        self.berth = Some(berth);
        self
    }

    /// Attaches a retry attempt count.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a retry delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_set_fields() {
        let ev = Event::now(EventKind::FuelDrained)
            .with_actor("vehicle-3")
            .with_fuel(FuelKind::Nitrogen)
            .with_amount(42)
            .with_level(958);

        assert_eq!(ev.kind, EventKind::FuelDrained);
        assert_eq!(ev.actor.as_deref(), Some("vehicle-3"));
        assert_eq!(ev.fuel, Some(FuelKind::Nitrogen));
        assert_eq!(ev.amount, Some(42));
        assert_eq!(ev.level, Some(958));
        assert!(ev.berth.is_none());
    }

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::now(EventKind::Docked);
        let b = Event::now(EventKind::Undocked);
        assert!(b.seq > a.seq);
    }
}
