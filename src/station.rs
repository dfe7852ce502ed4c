//! # Station: the composite dock → transact → undock protocol.
//!
//! [`Station`] composes one [`SlotPool`] and two [`Reservoir`]s (nitrogen and
//! quantum) behind a single coordination boundary. Actors never touch the
//! underlying resources; every mutation goes through the station's operation
//! set:
//!
//! ```text
//! begin_docking() ──► DockingHandle
//!        │
//!        ├─► transact_nitrogen(&handle, amount, flow)
//!        ├─► transact_quantum(&handle, amount, flow)
//!        │
//! end_docking(&mut handle) ──► slot released, handle invalidated
//! ```
//!
//! ## Docking policy
//! The blocking operations implement **hold-and-wait**: a docked actor may
//! suspend on a reservoir while keeping its slot. Reservoirs are never held
//! while waiting on the slot pool and no operation touches more than one
//! resource's internals at a time, so no lock-ordering or cross-resource
//! deadlock is possible. The tradeoff is dock throughput: an actor waiting
//! out a fuel shortage occupies its slot the whole time. Callers that want
//! try-or-requeue semantics instead build them from the `try_*` surface
//! (see [`DockingPolicy`](crate::policies::DockingPolicy)).
//!
//! ## Handle discipline
//! Transacting on an ended handle or ending a handle twice is a
//! [`StationError::ProtocolViolation`]. Dropping a handle without ending it
//! releases the slot anyway (RAII backstop), so a panicking actor cannot
//! strand a docking slot.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use tokio_util::sync::CancellationToken;

use crate::config::StationConfig;
use crate::error::StationError;
use crate::resources::{Reservoir, SlotPermit, SlotPool};

/// The two fuels a station serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuelKind {
    /// Nitrogen reservoir.
    Nitrogen,
    /// Quantum reservoir.
    Quantum,
}

impl FuelKind {
    /// Returns a short stable label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            FuelKind::Nitrogen => "nitrogen",
            FuelKind::Quantum => "quantum",
        }
    }
}

/// Direction of a fuel transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuelFlow {
    /// Take fuel out of the reservoir (vehicles).
    Consume,
    /// Put fuel into the reservoir (refillers).
    Supply,
}

/// Token for one held docking slot, valid from [`Station::begin_docking`] to
/// its matching [`Station::end_docking`].
#[derive(Debug)]
pub struct DockingHandle {
    berth: u64,
    slot: Option<SlotPermit>,
}

impl DockingHandle {
    /// Returns the berth number assigned to this docking.
    pub fn berth(&self) -> u64 {
        self.berth
    }

    /// Returns `true` until the handle has been ended.
    pub fn is_active(&self) -> bool {
        self.slot.is_some()
    }

    fn ensure_active(&self) -> Result<(), StationError> {
        if self.slot.is_none() {
            return Err(StationError::ProtocolViolation {
                reason: "operation on an already-ended docking handle",
            });
        }
        Ok(())
    }
}

/// Berth numbers are process-global so interleaved dockings stay
/// distinguishable in event streams.
static NEXT_BERTH: AtomicU64 = AtomicU64::new(1);

/// A refueling station: one docking bay, two fuel reservoirs.
///
/// Constructed once per run with fixed capacities; shared across actors via
/// clone (all clones observe the same resources).
#[derive(Clone, Debug)]
pub struct Station {
    slots: SlotPool,
    nitrogen: Reservoir,
    quantum: Reservoir,
}

impl Station {
    /// Creates a station with the configured capacities, reservoirs empty.
    pub fn new(cfg: StationConfig) -> Self {
        Self {
            slots: SlotPool::new(cfg.dock_slots),
            nitrogen: Reservoir::new(cfg.nitrogen_capacity),
            quantum: Reservoir::new(cfg.quantum_capacity),
        }
    }

    /// Occupies a docking slot, suspending while the bay is full.
    pub async fn begin_docking(
        &self,
        ctx: &CancellationToken,
    ) -> Result<DockingHandle, StationError> {
        let slot = self.slots.acquire(ctx).await?;
        Ok(self.handle_for(slot))
    }

    /// Non-blocking [`Station::begin_docking`]: `Ok(None)` means the bay is full.
    pub fn try_begin_docking(&self) -> Result<Option<DockingHandle>, StationError> {
        Ok(self.slots.try_acquire()?.map(|slot| self.handle_for(slot)))
    }

    /// Transacts nitrogen for a docked actor, suspending until feasible.
    pub async fn transact_nitrogen(
        &self,
        handle: &DockingHandle,
        amount: u32,
        flow: FuelFlow,
        ctx: &CancellationToken,
    ) -> Result<(), StationError> {
        handle.ensure_active()?;
        self.transfer(&self.nitrogen, amount, flow, ctx).await
    }

    /// Transacts quantum fuel for a docked actor, suspending until feasible.
    pub async fn transact_quantum(
        &self,
        handle: &DockingHandle,
        amount: u32,
        flow: FuelFlow,
        ctx: &CancellationToken,
    ) -> Result<(), StationError> {
        handle.ensure_active()?;
        self.transfer(&self.quantum, amount, flow, ctx).await
    }

    /// Non-blocking nitrogen transaction: `Ok(false)` means it would wait.
    pub fn try_transact_nitrogen(
        &self,
        handle: &DockingHandle,
        amount: u32,
        flow: FuelFlow,
    ) -> Result<bool, StationError> {
        handle.ensure_active()?;
        self.try_transfer(&self.nitrogen, amount, flow)
    }

    /// Non-blocking quantum transaction: `Ok(false)` means it would wait.
    pub fn try_transact_quantum(
        &self,
        handle: &DockingHandle,
        amount: u32,
        flow: FuelFlow,
    ) -> Result<bool, StationError> {
        handle.ensure_active()?;
        self.try_transfer(&self.quantum, amount, flow)
    }

    /// Releases the slot and invalidates the handle.
    ///
    /// Ending the same handle twice is a [`StationError::ProtocolViolation`].
    pub fn end_docking(&self, handle: &mut DockingHandle) -> Result<(), StationError> {
        match handle.slot.take() {
            Some(slot) => {
                drop(slot);
                Ok(())
            }
            None => Err(StationError::ProtocolViolation {
                reason: "docking handle ended twice",
            }),
        }
    }

    /// Closes the station: all blocked and future operations observe
    /// [`StationError::Cancelled`]. Levels and held slots are untouched.
    pub fn close(&self) {
        self.slots.close();
        self.nitrogen.close();
        self.quantum.close();
    }

    /// Current nitrogen level (observation only).
    pub fn nitrogen_level(&self) -> u32 {
        self.nitrogen.level()
    }

    /// Current quantum level (observation only).
    pub fn quantum_level(&self) -> u32 {
        self.quantum.level()
    }

    /// Currently occupied docking slots (observation only).
    pub fn occupied_slots(&self) -> u32 {
        self.slots.occupied()
    }

    /// Level of the given reservoir (observation only).
    pub fn level(&self, fuel: FuelKind) -> u32 {
        self.reservoir(fuel).level()
    }

    fn handle_for(&self, slot: SlotPermit) -> DockingHandle {
        DockingHandle {
            berth: NEXT_BERTH.fetch_add(1, AtomicOrdering::Relaxed),
            slot: Some(slot),
        }
    }

    fn reservoir(&self, fuel: FuelKind) -> &Reservoir {
        match fuel {
            FuelKind::Nitrogen => &self.nitrogen,
            FuelKind::Quantum => &self.quantum,
        }
    }

    async fn transfer(
        &self,
        reservoir: &Reservoir,
        amount: u32,
        flow: FuelFlow,
        ctx: &CancellationToken,
    ) -> Result<(), StationError> {
        match flow {
            FuelFlow::Consume => reservoir.drain(amount, ctx).await,
            FuelFlow::Supply => reservoir.add(amount, ctx).await,
        }
    }

    fn try_transfer(
        &self,
        reservoir: &Reservoir,
        amount: u32,
        flow: FuelFlow,
    ) -> Result<bool, StationError> {
        match flow {
            FuelFlow::Consume => reservoir.try_drain(amount),
            FuelFlow::Supply => reservoir.try_add(amount),
        }
    }
}
