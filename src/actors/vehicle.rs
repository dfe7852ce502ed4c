//! # Vehicle: the consuming actor.
//!
//! A [`Vehicle`] repeatedly docks, drains a sampled amount of each fuel, and
//! undocks, idling between transactions per its
//! [`PacePolicy`](crate::policies::PacePolicy).
//!
//! ## Loop
//! ```text
//! loop {
//!   ├─► sample FuelDemand → consume plan
//!   ├─► run transaction under DockingPolicy
//!   ├─► stop if rounds exhausted
//!   └─► pace sleep (cancellable)
//! }
//! ```
//!
//! Cancellation observed at any point is a graceful stop (`Ok(())`); only
//! station-reported caller bugs (invalid request, protocol violation) abort
//! the loop with an error.

use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::actors::{pace_sleep, run_transaction, Actor, ActorRef, FuelDemand, FuelPlan};
use crate::error::StationError;
use crate::events::Bus;
use crate::policies::{DockingPolicy, PacePolicy};
use crate::station::Station;

/// Consuming actor: drains both reservoirs each round.
pub struct Vehicle {
    name: Cow<'static, str>,
    station: Station,
    bus: Bus,
    demand: FuelDemand,
    pace: PacePolicy,
    docking: DockingPolicy,
    rounds: Option<u64>,
}

impl Vehicle {
    /// Creates a vehicle with default pacing, hold-and-wait docking, and an
    /// unbounded loop.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        station: Station,
        bus: Bus,
        demand: FuelDemand,
    ) -> Self {
        Self {
            name: name.into(),
            station,
            bus,
            demand,
            pace: PacePolicy::default(),
            docking: DockingPolicy::default(),
            rounds: None,
        }
    }

    /// Creates the vehicle and returns it as a shared handle.
    pub fn arc(
        name: impl Into<Cow<'static, str>>,
        station: Station,
        bus: Bus,
        demand: FuelDemand,
    ) -> ActorRef {
        Arc::new(Self::new(name, station, bus, demand))
    }

    /// Returns a vehicle with updated pacing.
    pub fn with_pace(mut self, pace: PacePolicy) -> Self {
        self.pace = pace;
        self
    }

    /// Returns a vehicle with an updated docking policy.
    pub fn with_docking(mut self, docking: DockingPolicy) -> Self {
        self.docking = docking;
        self
    }

    /// Returns a vehicle that stops after `rounds` completed transactions.
    pub fn with_rounds(mut self, rounds: u64) -> Self {
        self.rounds = Some(rounds);
        self
    }
}

#[async_trait]
impl Actor for Vehicle {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: CancellationToken) -> Result<(), StationError> {
        let mut completed: u64 = 0;
        loop {
            if ctx.is_cancelled() {
                return Ok(());
            }
            let (nitrogen, quantum) = self.demand.sample();
            let plan = FuelPlan::consume(nitrogen, quantum);
            match run_transaction(&self.station, &self.name, plan, &self.docking, &ctx, &self.bus)
                .await
            {
                Ok(()) => {}
                Err(e) if e.is_graceful() => return Ok(()),
                Err(e) => return Err(e),
            }

            completed += 1;
            if let Some(rounds) = self.rounds {
                if completed >= rounds {
                    return Ok(());
                }
            }
            if pace_sleep(self.pace.next(), &ctx).await.is_err() {
                return Ok(());
            }
        }
    }
}
