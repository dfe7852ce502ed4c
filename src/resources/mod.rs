//! Bounded resources owned by the station: fuel reservoirs and the docking bay.

mod reservoir;
mod slots;

pub use reservoir::Reservoir;
pub use slots::{SlotPermit, SlotPool};
