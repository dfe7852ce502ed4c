//! # Actor protocols: vehicles and refillers.
//!
//! An [`Actor`] is an async, cancelable unit that repeatedly transacts with
//! the station. The crate ships the two reference protocols — [`Vehicle`]
//! (consumer) and [`Refiller`] (producer) — both expressed over the shared
//! transaction routine in this module, parameterized by a
//! [`DockingPolicy`](crate::policies::DockingPolicy), a
//! [`PacePolicy`](crate::policies::PacePolicy), and a [`FuelDemand`] profile.
//!
//! Actors should regularly check their [`CancellationToken`] and exit
//! promptly during shutdown; cancellation observed anywhere inside the loop
//! is a graceful stop, not a failure.

mod profile;
mod refiller;
mod transact;
mod vehicle;

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::StationError;

pub use profile::FuelDemand;
pub use refiller::Refiller;
pub use transact::FuelPlan;
pub use vehicle::Vehicle;

pub(crate) use transact::{pace_sleep, run_transaction};

/// # Asynchronous, cancelable station client.
///
/// An `Actor` has a stable [`name`](Actor::name) and an async
/// [`run`](Actor::run) method that receives a [`CancellationToken`].
/// `run` returns `Ok(())` on graceful completion (rounds exhausted or
/// cancellation observed) and an error only for caller bugs surfaced by the
/// station.
#[async_trait]
pub trait Actor: Send + Sync + 'static {
    /// Returns a stable, human-readable actor name.
    fn name(&self) -> &str;

    /// Runs the actor loop until completion or cancellation.
    async fn run(&self, ctx: CancellationToken) -> Result<(), StationError>;
}

/// Shared handle to an actor.
pub type ActorRef = Arc<dyn Actor>;
