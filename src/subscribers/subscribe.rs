//! # Subscriber trait.
//!
//! A [`Subscribe`] implementation receives every event the fleet forwards
//! from the bus, one at a time, in sequence order. Handlers should be quick;
//! a slow subscriber delays delivery to the ones after it and can make the
//! shared bus receiver lag.

use async_trait::async_trait;

use crate::events::Event;

/// # Receiver of station events.
///
/// Implement this to attach logging, metrics, or assertions to a
/// [`Fleet`](crate::Fleet) run.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use fuelbay::{Event, EventKind, Subscribe};
/// use std::sync::atomic::{AtomicU64, Ordering};
///
/// #[derive(Default)]
/// struct DockCounter(AtomicU64);
///
/// #[async_trait]
/// impl Subscribe for DockCounter {
///     fn name(&self) -> &str { "dock-counter" }
///
///     async fn on_event(&self, event: &Event) {
///         if event.kind == EventKind::Docked {
///             self.0.fetch_add(1, Ordering::Relaxed);
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Returns a stable subscriber name for logs.
    fn name(&self) -> &str {
        "subscriber"
    }

    /// Handles one event.
    async fn on_event(&self, event: &Event);
}
