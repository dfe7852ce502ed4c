//! # fuelbay
//!
//! Async coordination core for a shared refueling station: a fixed-size
//! docking bay, two bounded fuel reservoirs, and cancelable vehicle/refiller
//! actors that transact against them.
//!
//! ```text
//!            ┌───────────────────────────────────────────┐
//!            │                  Fleet                    │
//!            │   signals · grace shutdown · event bus    │
//!            └───────┬───────────────────────┬───────────┘
//!                    │ child tokens          │ events
//!          ┌─────────▼─────────┐   ┌─────────▼─────────┐
//!          │  Vehicle actors   │   │    subscribers    │
//!          │  Refiller actors  │   └───────────────────┘
//!          └─────────┬─────────┘
//!                    │ dock → transact → undock
//!          ┌─────────▼─────────────────────────────┐
//!          │                Station                │
//!          │  ┌─────────┐ ┌──────────┐ ┌─────────┐ │
//!          │  │ SlotPool│ │ nitrogen │ │ quantum │ │
//!          │  │  (bay)  │ │ Reservoir│ │Reservoir│ │
//!          │  └─────────┘ └──────────┘ └─────────┘ │
//!          └───────────────────────────────────────┘
//! ```
//!
//! ## Core pieces
//! - [`Reservoir`] — bounded fuel store; blocking [`drain`](Reservoir::drain)
//!   and [`add`](Reservoir::add) wait for capacity, `try_*` variants report
//!   contention as `Ok(false)`, and requests above total capacity fail fast
//!   with [`StationError::InvalidRequest`].
//! - [`SlotPool`] — the docking bay; acquiring returns a [`SlotPermit`] whose
//!   drop releases the slot, so unmatched or double releases cannot happen.
//! - [`Station`] — composes the bay and both reservoirs behind the
//!   dock → transact → undock protocol with a [`DockingHandle`].
//! - [`Vehicle`] / [`Refiller`] — the consumer and producer [`Actor`]
//!   protocols, parameterized by [`FuelDemand`], [`PacePolicy`], and
//!   [`DockingPolicy`] (hold-and-wait or requeue-on-contention with
//!   [`BackoffPolicy`] delays).
//! - [`Fleet`] — runs the actors, handles OS signals, enforces the shutdown
//!   grace period, and forwards [`Event`]s from the [`Bus`] to [`Subscribe`]rs.
//!
//! ## Quick start
//! ```no_run
//! use std::sync::Arc;
//! use fuelbay::{
//!     Fleet, FleetConfig, FuelDemand, Refiller, Station, StationConfig, Vehicle,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), fuelbay::FleetError> {
//!     let station = Station::new(StationConfig::default());
//!     let fleet = Fleet::new(FleetConfig::default());
//!
//!     let actors = vec![
//!         Vehicle::arc(
//!             "vehicle-1",
//!             station.clone(),
//!             fleet.bus().clone(),
//!             FuelDemand::Uniform { nitrogen_max: 100, quantum_max: 100 },
//!         ),
//!         Refiller::arc(
//!             "refiller-1",
//!             station.clone(),
//!             fleet.bus().clone(),
//!             FuelDemand::Fixed { nitrogen: 500, quantum: 500 },
//!         ),
//!     ];
//!
//!     // Runs until SIGINT/SIGTERM, then drains the actors gracefully.
//!     fleet.run(actors).await
//! }
//! ```
//!
//! ## Feature flags
//! - `logging` — ships [`LogWriter`], a stdout subscriber for demos and
//!   debugging. Off by default.

mod actors;
mod config;
mod error;
mod events;
mod fleet;
mod policies;
mod resources;
mod station;
mod subscribers;

pub use actors::{Actor, ActorRef, FuelDemand, FuelPlan, Refiller, Vehicle};
pub use config::{FleetConfig, StationConfig};
pub use error::{FleetError, StationError};
pub use events::{Bus, Event, EventKind};
pub use fleet::Fleet;
pub use policies::{BackoffPolicy, DockingPolicy, JitterPolicy, PacePolicy};
pub use resources::{Reservoir, SlotPermit, SlotPool};
pub use station::{DockingHandle, FuelFlow, FuelKind, Station};
pub use subscribers::Subscribe;

#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
