//! # Docking bay slot pool.
//!
//! [`SlotPool`] is a bounded counter of occupied docking slots. `acquire`
//! suspends while the bay is full and returns a [`SlotPermit`]; dropping the
//! permit releases the slot and wakes one waiter.
//!
//! Release is tied to permit ownership, so an unmatched or double release is
//! unrepresentable: there is no release method to call without a permit in
//! hand, and a permit can only be dropped once. The wait queue is FIFO, so
//! slots are granted in arrival order.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;

use crate::error::StationError;

/// One held docking slot. Dropping it releases the slot.
#[derive(Debug)]
pub struct SlotPermit {
    _permit: OwnedSemaphorePermit,
}

/// A bounded pool of docking slots.
///
/// Cheap to clone (`Arc` internals); clones observe the same bay.
#[derive(Clone, Debug)]
pub struct SlotPool {
    capacity: u32,
    free: Arc<Semaphore>,
}

impl SlotPool {
    /// Creates a pool with the given number of slots, all free.
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            free: Arc::new(Semaphore::new(capacity as usize)),
        }
    }

    /// Returns the fixed slot count.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Returns the number of currently occupied slots.
    ///
    /// An observation for logs and tests; concurrent acquires and releases may
    /// change it before the caller looks at it.
    pub fn occupied(&self) -> u32 {
        self.capacity - self.free.available_permits() as u32
    }

    /// Occupies one slot, suspending while the bay is full.
    ///
    /// Returns [`StationError::Cancelled`] if `ctx` fires or the pool is
    /// closed while waiting.
    pub async fn acquire(&self, ctx: &CancellationToken) -> Result<SlotPermit, StationError> {
        let acquire = self.free.clone().acquire_owned();
        tokio::pin!(acquire);

        let permit = tokio::select! {
            res = &mut acquire => res.map_err(|_closed| StationError::Cancelled)?,
            _ = ctx.cancelled() => return Err(StationError::Cancelled),
        };
        Ok(SlotPermit { _permit: permit })
    }

    /// Non-blocking acquire: `Ok(None)` means the bay is currently full.
    pub fn try_acquire(&self) -> Result<Option<SlotPermit>, StationError> {
        match self.free.clone().try_acquire_owned() {
            Ok(permit) => Ok(Some(SlotPermit { _permit: permit })),
            Err(tokio::sync::TryAcquireError::NoPermits) => Ok(None),
            Err(tokio::sync::TryAcquireError::Closed) => Err(StationError::Cancelled),
        }
    }

    /// Closes the pool: all current and future acquirers observe
    /// [`StationError::Cancelled`]. Already-held permits release normally.
    pub fn close(&self) {
        self.free.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn ctx() -> CancellationToken {
        CancellationToken::new()
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn test_acquire_and_release_track_occupancy() {
        let bay = SlotPool::new(3);
        assert_eq!(bay.occupied(), 0);

        let a = bay.acquire(&ctx()).await.unwrap();
        let b = bay.acquire(&ctx()).await.unwrap();
        assert_eq!(bay.occupied(), 2);

        drop(a);
        assert_eq!(bay.occupied(), 1);
        drop(b);
        assert_eq!(bay.occupied(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_two_of_three_proceed_at_capacity_two() {
        // Slot capacity 2, three concurrent acquirers: exactly two proceed;
        // the third unblocks only after one of the first two releases.
        let bay = SlotPool::new(2);

        let mut handles = Vec::new();
        for _ in 0..3 {
            let bay = bay.clone();
            handles.push(tokio::spawn(async move { bay.acquire(&ctx()).await }));
        }
        settle().await;

        let finished = handles.iter().filter(|h| h.is_finished()).count();
        assert_eq!(finished, 2, "exactly two acquirers should hold slots");
        assert_eq!(bay.occupied(), 2);

        // Release one held slot; the third acquirer takes it over.
        let mut held = Vec::new();
        let mut waiting = Vec::new();
        for h in handles {
            if h.is_finished() {
                held.push(h.await.unwrap().unwrap());
            } else {
                waiting.push(h);
            }
        }
        drop(held.pop());

        let third = waiting.pop().expect("one waiter");
        let permit = tokio::time::timeout(Duration::from_secs(1), third)
            .await
            .expect("third acquirer unblocked")
            .unwrap()
            .unwrap();
        assert_eq!(bay.occupied(), 2);
        drop(permit);
        drop(held);
        assert_eq!(bay.occupied(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_never_more_than_capacity_holders() {
        const SLOTS: u32 = 3;
        const ACTORS: usize = 20;

        let bay = SlotPool::new(SLOTS);
        let holders = Arc::new(AtomicU32::new(0));
        let peak = Arc::new(AtomicU32::new(0));

        let mut handles = Vec::new();
        for _ in 0..ACTORS {
            let bay = bay.clone();
            let holders = holders.clone();
            let peak = peak.clone();
            handles.push(tokio::spawn(async move {
                let permit = bay.acquire(&ctx()).await.unwrap();
                let now = holders.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                holders.fetch_sub(1, Ordering::SeqCst);
                drop(permit);
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        assert!(peak.load(Ordering::SeqCst) <= SLOTS);
        assert_eq!(bay.occupied(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_acquire_takes_nothing() {
        let bay = SlotPool::new(1);
        let held = bay.acquire(&ctx()).await.unwrap();

        let token = CancellationToken::new();
        let waiter = {
            let bay = bay.clone();
            let token = token.clone();
            tokio::spawn(async move { bay.acquire(&token).await })
        };
        settle().await;
        token.cancel();

        let res = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("cancel unblocked the waiter")
            .unwrap();
        assert!(matches!(res, Err(StationError::Cancelled)));
        assert_eq!(bay.occupied(), 1);
        drop(held);
        assert_eq!(bay.occupied(), 0);
    }

    #[tokio::test]
    async fn test_try_acquire_reports_full() {
        let bay = SlotPool::new(1);
        let held = bay.try_acquire().unwrap().expect("slot free");
        assert!(bay.try_acquire().unwrap().is_none());
        drop(held);
        assert!(bay.try_acquire().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_close_unblocks_acquirers() {
        let bay = SlotPool::new(1);
        let _held = bay.acquire(&ctx()).await.unwrap();
        let waiter = {
            let bay = bay.clone();
            tokio::spawn(async move { bay.acquire(&ctx()).await })
        };
        settle().await;

        bay.close();
        let res = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("close unblocked the waiter")
            .unwrap();
        assert!(matches!(res, Err(StationError::Cancelled)));
    }
}
