//! # Bounded fuel reservoir.
//!
//! [`Reservoir`] is a bounded numeric store with blocking-until-feasible
//! transfers. `drain` suspends until the requested amount is available;
//! `add` suspends until the requested headroom is available. Both are
//! cancellable and have non-blocking (`try_*`) and bounded-wait (`*_timeout`)
//! variants.
//!
//! ## Implementation
//! The level is represented as a pair of semaphores:
//! - `stock` holds one permit per unit currently in the tank;
//! - `space` holds one permit per unit of remaining headroom.
//!
//! A transfer acquires permits from one side and releases them to the other,
//! so `stock + space == capacity` at every observable instant and the level
//! can never leave `[0, capacity]`. The semaphore's FIFO wait queue serves
//! waiters in arrival order, which rules out starvation of either large or
//! small requests under contention.
//!
//! ## Cancellation
//! Every blocking operation races the wait against a [`CancellationToken`].
//! A cancelled waiter returns [`StationError::Cancelled`] and leaves the level
//! untouched; permits that were partially queued are handed back to the
//! semaphore. [`Reservoir::close`] unblocks all current and future waiters the
//! same way.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::error::StationError;

/// A bounded fuel tank with blocking, cancellable transfers.
///
/// Cheap to clone (`Arc` internals); clones observe the same tank.
#[derive(Clone, Debug)]
pub struct Reservoir {
    capacity: u32,
    /// Permits = units currently stored.
    stock: Arc<Semaphore>,
    /// Permits = remaining headroom.
    space: Arc<Semaphore>,
}

impl Reservoir {
    /// Creates an empty reservoir with the given capacity.
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            stock: Arc::new(Semaphore::new(0)),
            space: Arc::new(Semaphore::new(capacity as usize)),
        }
    }

    /// Returns the fixed capacity.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Returns the current level.
    ///
    /// Monotonicity across concurrent transfers is not guaranteed; this is an
    /// observation for logs and tests, not a synchronization primitive.
    pub fn level(&self) -> u32 {
        self.stock.available_permits() as u32
    }

    /// Removes `amount` units, suspending until the tank holds at least that much.
    ///
    /// Returns [`StationError::InvalidRequest`] immediately if `amount`
    /// exceeds the total capacity (the wait could never be satisfied), and
    /// [`StationError::Cancelled`] if `ctx` fires or the reservoir is closed
    /// while waiting.
    pub async fn drain(&self, amount: u32, ctx: &CancellationToken) -> Result<(), StationError> {
        self.check_feasible(amount)?;
        self.transfer(&self.stock, &self.space, amount, ctx).await
    }

    /// Adds `amount` units, suspending until the tank has that much headroom.
    ///
    /// Same error contract as [`Reservoir::drain`].
    pub async fn add(&self, amount: u32, ctx: &CancellationToken) -> Result<(), StationError> {
        self.check_feasible(amount)?;
        self.transfer(&self.space, &self.stock, amount, ctx).await
    }

    /// Non-blocking [`Reservoir::drain`]: `Ok(false)` means the transfer would
    /// have to wait. Not an error — temporarily insufficient stock is an
    /// ordinary outcome.
    pub fn try_drain(&self, amount: u32) -> Result<bool, StationError> {
        self.check_feasible(amount)?;
        self.try_transfer(&self.stock, &self.space, amount)
    }

    /// Non-blocking [`Reservoir::add`]: `Ok(false)` means the transfer would
    /// have to wait.
    pub fn try_add(&self, amount: u32) -> Result<bool, StationError> {
        self.check_feasible(amount)?;
        self.try_transfer(&self.space, &self.stock, amount)
    }

    /// Bounded-wait [`Reservoir::drain`]: gives up after `wait` and returns
    /// `Ok(false)` with the level untouched.
    pub async fn drain_timeout(
        &self,
        amount: u32,
        wait: Duration,
        ctx: &CancellationToken,
    ) -> Result<bool, StationError> {
        self.check_feasible(amount)?;
        match tokio::time::timeout(wait, self.transfer(&self.stock, &self.space, amount, ctx)).await
        {
            Ok(res) => res.map(|()| true),
            Err(_elapsed) => Ok(false),
        }
    }

    /// Bounded-wait [`Reservoir::add`]: gives up after `wait` and returns
    /// `Ok(false)` with the level untouched.
    pub async fn add_timeout(
        &self,
        amount: u32,
        wait: Duration,
        ctx: &CancellationToken,
    ) -> Result<bool, StationError> {
        self.check_feasible(amount)?;
        match tokio::time::timeout(wait, self.transfer(&self.space, &self.stock, amount, ctx)).await
        {
            Ok(res) => res.map(|()| true),
            Err(_elapsed) => Ok(false),
        }
    }

    /// Closes the reservoir: all current and future waiters observe
    /// [`StationError::Cancelled`]. The level is left as-is.
    pub fn close(&self) {
        self.stock.close();
        self.space.close();
    }

    /// Rejects requests that no amount of waiting could satisfy.
    fn check_feasible(&self, amount: u32) -> Result<(), StationError> {
        if amount > self.capacity {
            return Err(StationError::InvalidRequest {
                requested: amount,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Moves `amount` permits from one side of the tank to the other.
    ///
    /// The acquire is all-or-nothing: dropping the wait (cancellation,
    /// timeout) returns any partially assigned permits to the semaphore.
    async fn transfer(
        &self,
        from: &Arc<Semaphore>,
        to: &Arc<Semaphore>,
        amount: u32,
        ctx: &CancellationToken,
    ) -> Result<(), StationError> {
        if amount == 0 {
            return Ok(());
        }

        let acquire = from.clone().acquire_many_owned(amount);
        tokio::pin!(acquire);

        let permit = tokio::select! {
            res = &mut acquire => res.map_err(|_closed| StationError::Cancelled)?,
            _ = ctx.cancelled() => return Err(StationError::Cancelled),
        };

        // The permits change sides permanently; forget them on the source and
        // mint the same count on the destination.
        permit.forget();
        to.add_permits(amount as usize);
        Ok(())
    }

    fn try_transfer(
        &self,
        from: &Arc<Semaphore>,
        to: &Arc<Semaphore>,
        amount: u32,
    ) -> Result<bool, StationError> {
        if amount == 0 {
            return Ok(true);
        }
        match from.try_acquire_many(amount) {
            Ok(permit) => {
                permit.forget();
                to.add_permits(amount as usize);
                Ok(true)
            }
            Err(tokio::sync::TryAcquireError::NoPermits) => Ok(false),
            Err(tokio::sync::TryAcquireError::Closed) => Err(StationError::Cancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn ctx() -> CancellationToken {
        CancellationToken::new()
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn test_add_then_drain_round_trip() {
        let tank = Reservoir::new(100);
        tank.add(60, &ctx()).await.unwrap();
        assert_eq!(tank.level(), 60);
        tank.drain(25, &ctx()).await.unwrap();
        assert_eq!(tank.level(), 35);
    }

    #[tokio::test]
    async fn test_zero_amount_is_noop() {
        let tank = Reservoir::new(10);
        tank.add(0, &ctx()).await.unwrap();
        tank.drain(0, &ctx()).await.unwrap();
        assert_eq!(tank.level(), 0);
    }

    #[tokio::test]
    async fn test_invalid_request_fails_fast() {
        let tank = Reservoir::new(100);
        // Must return immediately, not block: give it a short deadline.
        let res = tokio::time::timeout(Duration::from_millis(100), tank.drain(101, &ctx()))
            .await
            .expect("returned immediately");
        assert_eq!(
            res,
            Err(StationError::InvalidRequest {
                requested: 101,
                capacity: 100
            })
        );

        let res = tokio::time::timeout(Duration::from_millis(100), tank.add(500, &ctx()))
            .await
            .expect("returned immediately");
        assert!(matches!(res, Err(StationError::InvalidRequest { .. })));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_no_lost_updates() {
        const N: usize = 50;
        let tank = Reservoir::new(N as u32);

        let mut adds = Vec::new();
        for _ in 0..N {
            let tank = tank.clone();
            adds.push(tokio::spawn(async move { tank.add(1, &ctx()).await }));
        }
        for h in adds {
            h.await.unwrap().unwrap();
        }
        assert_eq!(tank.level(), N as u32);

        let mut drains = Vec::new();
        for _ in 0..N {
            let tank = tank.clone();
            drains.push(tokio::spawn(async move { tank.drain(1, &ctx()).await }));
        }
        for h in drains {
            h.await.unwrap().unwrap();
        }
        assert_eq!(tank.level(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_third_add_blocks_until_drain_frees_space() {
        // Capacity 100, level 0: three concurrent add(40) calls. Two fit
        // (80 <= 100), the third waits; a drain(30) lets it through,
        // leaving the level at 90.
        let tank = Reservoir::new(100);

        let mut handles = Vec::new();
        for _ in 0..3 {
            let tank = tank.clone();
            handles.push(tokio::spawn(async move { tank.add(40, &ctx()).await }));
        }
        settle().await;

        assert_eq!(tank.level(), 80);
        let pending: Vec<_> = handles.iter().filter(|h| !h.is_finished()).collect();
        assert_eq!(pending.len(), 1, "exactly one add should still be waiting");

        tank.drain(30, &ctx()).await.unwrap();
        for h in handles {
            tokio::time::timeout(Duration::from_secs(1), h)
                .await
                .expect("unblocked after drain")
                .unwrap()
                .unwrap();
        }
        assert_eq!(tank.level(), 90);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_blocked_drain_completes_when_stock_arrives() {
        let tank = Reservoir::new(10);
        let waiter = {
            let tank = tank.clone();
            tokio::spawn(async move { tank.drain(7, &ctx()).await })
        };
        settle().await;
        assert!(!waiter.is_finished(), "drain should wait for stock");

        tank.add(7, &ctx()).await.unwrap();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("drain unblocked")
            .unwrap()
            .unwrap();
        assert_eq!(tank.level(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_cancelled_drain_leaves_level_unchanged() {
        let tank = Reservoir::new(10);
        tank.add(3, &ctx()).await.unwrap();

        let token = CancellationToken::new();
        let waiter = {
            let tank = tank.clone();
            let token = token.clone();
            tokio::spawn(async move { tank.drain(8, &token).await })
        };
        settle().await;
        assert!(!waiter.is_finished());

        token.cancel();
        let res = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("cancel unblocked the waiter")
            .unwrap();
        assert_eq!(res, Err(StationError::Cancelled));
        // Nothing was taken, and the queued request holds no stock hostage.
        assert_eq!(tank.level(), 3);
        tank.add(7, &ctx()).await.unwrap();
        assert_eq!(tank.level(), 10);
    }

    #[tokio::test]
    async fn test_close_unblocks_waiters() {
        let tank = Reservoir::new(10);
        let waiter = {
            let tank = tank.clone();
            tokio::spawn(async move { tank.drain(5, &ctx()).await })
        };
        settle().await;

        tank.close();
        let res = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("close unblocked the waiter")
            .unwrap();
        assert_eq!(res, Err(StationError::Cancelled));
    }

    #[tokio::test]
    async fn test_try_variants_report_would_block() {
        let tank = Reservoir::new(10);
        assert_eq!(tank.try_drain(1), Ok(false));
        assert_eq!(tank.try_add(10), Ok(true));
        assert_eq!(tank.try_add(1), Ok(false));
        assert_eq!(tank.try_drain(4), Ok(true));
        assert_eq!(tank.level(), 6);
        assert!(matches!(
            tank.try_drain(11),
            Err(StationError::InvalidRequest { .. })
        ));
    }

    #[tokio::test]
    async fn test_timeout_variant_gives_up_without_side_effects() {
        let tank = Reservoir::new(10);
        tank.add(10, &ctx()).await.unwrap();

        let added = tank
            .add_timeout(5, Duration::from_millis(30), &ctx())
            .await
            .unwrap();
        assert!(!added);
        assert_eq!(tank.level(), 10);

        let drained = tank
            .drain_timeout(5, Duration::from_millis(30), &ctx())
            .await
            .unwrap();
        assert!(drained);
        assert_eq!(tank.level(), 5);
    }
}
