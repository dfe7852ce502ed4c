//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//!
//! ## Output format
//! ```text
//! [starting] actor=vehicle-3
//! [docked] actor=vehicle-3 berth=17
//! [drained] actor=vehicle-3 fuel=nitrogen amount=42 level=958
//! [added] actor=refiller-1 fuel=quantum amount=400 level=700
//! [undocked] actor=vehicle-3 berth=17
//! [dock-retry] actor=vehicle-5 attempt=2 delay_ms=200
//! [shutdown-requested]
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Intended for development and demos;
/// implement a custom [`Subscribe`] for structured logging or metrics.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    fn name(&self) -> &str {
        "log-writer"
    }

    async fn on_event(&self, e: &Event) {
        let actor = e.actor.as_deref().unwrap_or("?");
        match e.kind {
            EventKind::ActorStarting => println!("[starting] actor={actor}"),
            EventKind::ActorStopped => println!("[stopped] actor={actor}"),
            EventKind::ActorFailed => {
                println!(
                    "[failed] actor={actor} reason={:?}",
                    e.reason.as_deref().unwrap_or("?")
                );
            }
            EventKind::Docked => {
                println!("[docked] actor={actor} berth={:?}", e.berth);
            }
            EventKind::Undocked => {
                println!("[undocked] actor={actor} berth={:?}", e.berth);
            }
            EventKind::FuelDrained => {
                println!(
                    "[drained] actor={actor} fuel={} amount={:?} level={:?}",
                    e.fuel.map(|f| f.as_label()).unwrap_or("?"),
                    e.amount,
                    e.level
                );
            }
            EventKind::FuelAdded => {
                println!(
                    "[added] actor={actor} fuel={} amount={:?} level={:?}",
                    e.fuel.map(|f| f.as_label()).unwrap_or("?"),
                    e.amount,
                    e.level
                );
            }
            EventKind::DockRetryScheduled => {
                println!(
                    "[dock-retry] actor={actor} attempt={:?} delay_ms={:?}",
                    e.attempt, e.delay_ms
                );
            }
            EventKind::ShutdownRequested => println!("[shutdown-requested]"),
            EventKind::AllStoppedWithin => println!("[all-stopped-within-grace]"),
            EventKind::GraceExceeded => println!("[grace-exceeded]"),
        }
    }
}
