//! # One refueling transaction, start to finish.
//!
//! [`run_transaction`] executes a single dock → transact → undock cycle for
//! an actor, publishing lifecycle events to the bus along the way.
//!
//! ## Event flow
//! ```text
//! Hold-and-wait:
//!   Docked → FuelDrained/FuelAdded (per kind) → Undocked
//!
//! Requeue-on-contention, when a step would block:
//!   [Docked → partial FuelDrained/FuelAdded → Undocked] →
//!   DockRetryScheduled → [sleep] → retry with the remaining kinds
//! ```
//!
//! ## Rules
//! - A docking that was begun is always ended, on every path including
//!   cancellation, so slots never outlive their transaction.
//! - Under requeue, a fuel kind already applied is never applied again; the
//!   per-kind operations are individually atomic and commutative, so the
//!   transaction completes kind-by-kind across retries.
//! - The retry attempt counter resets whenever a retry makes progress.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::StationError;
use crate::events::{Bus, Event, EventKind};
use crate::policies::DockingPolicy;
use crate::station::{DockingHandle, FuelFlow, FuelKind, Station};

/// Amounts one transaction moves, and in which direction.
///
/// A plan with both amounts zero still docks and undocks; the station treats
/// zero transfers as no-ops.
#[derive(Clone, Copy, Debug)]
pub struct FuelPlan {
    /// Nitrogen units to transfer.
    pub nitrogen: u32,
    /// Quantum units to transfer.
    pub quantum: u32,
    /// Direction for both transfers.
    pub flow: FuelFlow,
}

impl FuelPlan {
    /// Plan that drains both reservoirs (vehicle side).
    pub fn consume(nitrogen: u32, quantum: u32) -> Self {
        Self {
            nitrogen,
            quantum,
            flow: FuelFlow::Consume,
        }
    }

    /// Plan that feeds both reservoirs (refiller side).
    pub fn supply(nitrogen: u32, quantum: u32) -> Self {
        Self {
            nitrogen,
            quantum,
            flow: FuelFlow::Supply,
        }
    }

    fn is_done(&self) -> bool {
        self.nitrogen == 0 && self.quantum == 0
    }
}

/// Executes one transaction for `actor` under the given docking policy.
pub(crate) async fn run_transaction(
    station: &Station,
    actor: &str,
    plan: FuelPlan,
    policy: &DockingPolicy,
    ctx: &CancellationToken,
    bus: &Bus,
) -> Result<(), StationError> {
    match policy {
        DockingPolicy::HoldAndWait => hold_and_wait(station, actor, plan, ctx, bus).await,
        DockingPolicy::RequeueOnContention { backoff } => {
            let mut remaining = plan;
            let mut attempt: u32 = 0;
            loop {
                if ctx.is_cancelled() {
                    return Err(StationError::Cancelled);
                }
                let progressed = try_once(station, actor, &mut remaining, bus)?;
                if remaining.is_done() {
                    return Ok(());
                }
                attempt = if progressed {
                    0
                } else {
                    attempt.saturating_add(1)
                };

                let delay = backoff.next(attempt);
                bus.publish(
                    Event::now(EventKind::DockRetryScheduled)
                        .with_actor(actor)
                        .with_attempt(attempt)
                        .with_delay(delay),
                );
                pace_sleep(delay, ctx).await?;
            }
        }
    }
}

/// Policy A: dock, block on each reservoir while holding the slot, undock.
async fn hold_and_wait(
    station: &Station,
    actor: &str,
    plan: FuelPlan,
    ctx: &CancellationToken,
    bus: &Bus,
) -> Result<(), StationError> {
    let mut dock = station.begin_docking(ctx).await?;
    publish_docked(bus, actor, &dock);

    // End the docking on every path; a cancelled fuel wait must not strand
    // the slot.
    let res = apply_blocking(station, actor, &dock, plan, ctx, bus).await;
    let berth = dock.berth();
    station.end_docking(&mut dock)?;
    bus.publish(
        Event::now(EventKind::Undocked)
            .with_actor(actor)
            .with_berth(berth),
    );
    res
}

async fn apply_blocking(
    station: &Station,
    actor: &str,
    dock: &DockingHandle,
    plan: FuelPlan,
    ctx: &CancellationToken,
    bus: &Bus,
) -> Result<(), StationError> {
    if plan.nitrogen > 0 {
        station
            .transact_nitrogen(dock, plan.nitrogen, plan.flow, ctx)
            .await?;
        publish_transfer(bus, actor, station, FuelKind::Nitrogen, plan.nitrogen, plan.flow);
    }
    if plan.quantum > 0 {
        station
            .transact_quantum(dock, plan.quantum, plan.flow, ctx)
            .await?;
        publish_transfer(bus, actor, station, FuelKind::Quantum, plan.quantum, plan.flow);
    }
    Ok(())
}

/// Policy B step: dock if free, apply whatever fits right now, undock.
///
/// Returns `Ok(true)` if any resource was applied this round. Applied kinds
/// are zeroed out of `remaining`.
fn try_once(
    station: &Station,
    actor: &str,
    remaining: &mut FuelPlan,
    bus: &Bus,
) -> Result<bool, StationError> {
    let Some(mut dock) = station.try_begin_docking()? else {
        return Ok(false);
    };
    publish_docked(bus, actor, &dock);

    let mut progressed = false;
    if remaining.nitrogen > 0
        && station.try_transact_nitrogen(&dock, remaining.nitrogen, remaining.flow)?
    {
        publish_transfer(
            bus,
            actor,
            station,
            FuelKind::Nitrogen,
            remaining.nitrogen,
            remaining.flow,
        );
        remaining.nitrogen = 0;
        progressed = true;
    }
    if remaining.quantum > 0
        && station.try_transact_quantum(&dock, remaining.quantum, remaining.flow)?
    {
        publish_transfer(
            bus,
            actor,
            station,
            FuelKind::Quantum,
            remaining.quantum,
            remaining.flow,
        );
        remaining.quantum = 0;
        progressed = true;
    }

    let berth = dock.berth();
    station.end_docking(&mut dock)?;
    bus.publish(
        Event::now(EventKind::Undocked)
            .with_actor(actor)
            .with_berth(berth),
    );
    Ok(progressed)
}

/// Sleeps for `delay`, aborting early with [`StationError::Cancelled`] when
/// the token fires.
pub(crate) async fn pace_sleep(
    delay: Duration,
    ctx: &CancellationToken,
) -> Result<(), StationError> {
    if delay.is_zero() {
        if ctx.is_cancelled() {
            return Err(StationError::Cancelled);
        }
        return Ok(());
    }
    tokio::select! {
        _ = tokio::time::sleep(delay) => Ok(()),
        _ = ctx.cancelled() => Err(StationError::Cancelled),
    }
}

fn publish_docked(bus: &Bus, actor: &str, dock: &DockingHandle) {
    bus.publish(
        Event::now(EventKind::Docked)
            .with_actor(actor)
            .with_berth(dock.berth()),
    );
}

fn publish_transfer(
    bus: &Bus,
    actor: &str,
    station: &Station,
    fuel: FuelKind,
    amount: u32,
    flow: FuelFlow,
) {
    let kind = match flow {
        FuelFlow::Consume => EventKind::FuelDrained,
        FuelFlow::Supply => EventKind::FuelAdded,
    };
    bus.publish(
        Event::now(kind)
            .with_actor(actor)
            .with_fuel(fuel)
            .with_amount(amount)
            .with_level(station.level(fuel)),
    );
}
