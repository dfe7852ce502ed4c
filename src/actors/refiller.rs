//! # Refiller: the producing actor.
//!
//! A [`Refiller`] repeatedly docks, supplies a (typically fixed, large)
//! amount of each fuel, and undocks. The loop shape is identical to the
//! vehicle's; only the transfer direction differs, so a station needs at
//! least one refiller for its vehicles to ever make progress.

use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::actors::{pace_sleep, run_transaction, Actor, ActorRef, FuelDemand, FuelPlan};
use crate::error::StationError;
use crate::events::Bus;
use crate::policies::{DockingPolicy, PacePolicy};
use crate::station::Station;

/// Producing actor: feeds both reservoirs each round.
pub struct Refiller {
    name: Cow<'static, str>,
    station: Station,
    bus: Bus,
    demand: FuelDemand,
    pace: PacePolicy,
    docking: DockingPolicy,
    rounds: Option<u64>,
}

impl Refiller {
    /// Creates a refiller with default pacing, hold-and-wait docking, and an
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

    /// Creates the refiller and returns it as a shared handle.
    pub fn arc(
        name: impl Into<Cow<'static, str>>,
        station: Station,
        bus: Bus,
        demand: FuelDemand,
    ) -> ActorRef {
        Arc::new(Self::new(name, station, bus, demand))
    }

    /// Returns a refiller with updated pacing.
    pub fn with_pace(mut self, pace: PacePolicy) -> Self {
        self.pace = pace;
        self
    }

    /// Returns a refiller with an updated docking policy.
    pub fn with_docking(mut self, docking: DockingPolicy) -> Self {
        self.docking = docking;
        self
    }

    /// Returns a refiller that stops after `rounds` completed transactions.
    pub fn with_rounds(mut self, rounds: u64) -> Self {
        self.rounds = Some(rounds);
        self
    }
}

#[async_trait]
impl Actor for Refiller {
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
            let plan = FuelPlan::supply(nitrogen, quantum);
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
