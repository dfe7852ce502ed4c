//! Event bus and event types for observing the station at runtime.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
