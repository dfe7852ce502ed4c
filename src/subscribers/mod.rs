//! Subscriber seam for observing the event bus.

mod subscribe;

pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
mod log;
#[cfg(feature = "logging")]
pub use log::LogWriter;
