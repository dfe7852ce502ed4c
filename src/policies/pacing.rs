//! # Inter-transaction pacing.
//!
//! [`PacePolicy`] produces the idle delay an actor observes between two
//! consecutive transactions: a uniformly random duration in `[min, max]`.
//! [`PacePolicy::none`] yields zero delays so tests and demos can run the
//! actor loops flat out without wall-clock waits.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use fuelbay::PacePolicy;
//!
//! let pace = PacePolicy::uniform(Duration::from_secs(2), Duration::from_secs(12));
//! let d = pace.next();
//! assert!(d >= Duration::from_secs(2) && d <= Duration::from_secs(12));
//!
//! assert_eq!(PacePolicy::none().next(), Duration::ZERO);
//! ```

use rand::Rng;
use std::time::Duration;

/// Uniform random delay between an actor's consecutive transactions.
#[derive(Clone, Copy, Debug)]
pub struct PacePolicy {
    /// Lower bound of the delay range.
    pub min: Duration,
    /// Upper bound of the delay range.
    pub max: Duration,
}

impl Default for PacePolicy {
    /// Returns the reference pacing of `2s..=12s`.
    fn default() -> Self {
        Self::uniform(Duration::from_secs(2), Duration::from_secs(12))
    }
}

impl PacePolicy {
    /// Creates a policy drawing uniformly from `[min, max]`.
    pub fn uniform(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    /// Creates a zero-delay policy for deterministic runs.
    pub fn none() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    /// Draws the next delay. If `max <= min`, returns `min` unchanged.
    pub fn next(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let lo = self.min.as_millis() as u64;
        let hi = self.max.as_millis() as u64;
        let mut rng = rand::rng();
        Duration::from_millis(rng.random_range(lo..=hi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_always_zero() {
        let pace = PacePolicy::none();
        for _ in 0..10 {
            assert_eq!(pace.next(), Duration::ZERO);
        }
    }

    #[test]
    fn test_uniform_stays_in_range() {
        let pace = PacePolicy::uniform(Duration::from_millis(10), Duration::from_millis(20));
        for _ in 0..100 {
            let d = pace.next();
            assert!(d >= Duration::from_millis(10));
            assert!(d <= Duration::from_millis(20));
        }
    }

    #[test]
    fn test_degenerate_range_returns_min() {
        let pace = PacePolicy::uniform(Duration::from_millis(30), Duration::from_millis(30));
        assert_eq!(pace.next(), Duration::from_millis(30));
    }
}
