//! # Station and fleet configuration.
//!
//! [`StationConfig`] fixes the station's three capacities at construction
//! time; [`FleetConfig`] controls the runtime around the actors (shutdown
//! grace period and event bus sizing).
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use fuelbay::{FleetConfig, StationConfig};
//!
//! let station = StationConfig {
//!     dock_slots: 4,
//!     nitrogen_capacity: 1_000,
//!     quantum_capacity: 1_000,
//! };
//!
//! let mut fleet = FleetConfig::default();
//! fleet.grace = Duration::from_secs(10);
//!
//! assert_eq!(station.dock_slots, 4);
//! ```

use std::time::Duration;

/// Fixed capacities for one station instance.
///
/// All three values are set once at construction and never change for the
/// lifetime of the station.
#[derive(Clone, Copy, Debug)]
pub struct StationConfig {
    /// Number of docking slots in the bay.
    pub dock_slots: u32,
    /// Total capacity of the nitrogen reservoir.
    pub nitrogen_capacity: u32,
    /// Total capacity of the quantum reservoir.
    pub quantum_capacity: u32,
}

impl Default for StationConfig {
    /// Provides a small default station:
    /// - `dock_slots = 2`
    /// - `nitrogen_capacity = 1_000`
    /// - `quantum_capacity = 1_000`
    fn default() -> Self {
        Self {
            dock_slots: 2,
            nitrogen_capacity: 1_000,
            quantum_capacity: 1_000,
        }
    }
}

/// Global configuration for the fleet runtime.
///
/// Controls shutdown grace and event bus capacity.
#[derive(Clone, Debug)]
pub struct FleetConfig {
    /// Maximum time to wait for actors to stop after cancellation before giving up.
    pub grace: Duration,
    /// Capacity of the event bus channel.
    pub bus_capacity: usize,
}

impl Default for FleetConfig {
    /// Provides a default configuration:
    /// - `grace = 30s`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            grace: Duration::from_secs(30),
            bus_capacity: 1024,
        }
    }
}
