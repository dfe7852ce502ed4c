//! # Backoff policy for requeued transactions.
//!
//! [`BackoffPolicy`] controls how retry delays grow when a transaction keeps
//! finding the station contended. The delay for attempt `n` is
//! `first × factor^n`, clamped to `max`, with jitter applied last. The base
//! delay is derived purely from the attempt number, so jitter output never
//! feeds back into subsequent calculations.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use fuelbay::{BackoffPolicy, JitterPolicy};
//!
//! let backoff = BackoffPolicy {
//!     first: Duration::from_millis(100),
//!     max: Duration::from_secs(10),
//!     factor: 2.0,
//!     jitter: JitterPolicy::None,
//! };
//!
//! assert_eq!(backoff.next(0), Duration::from_millis(100));
//! assert_eq!(backoff.next(1), Duration::from_millis(200));
//! // 100ms × 2^10 overflows the cap.
//! assert_eq!(backoff.next(10), Duration::from_secs(10));
//! ```

use std::time::Duration;

use crate::policies::JitterPolicy;

/// Retry backoff policy for contended dockings.
#[derive(Clone, Copy, Debug)]
pub struct BackoffPolicy {
    /// Initial delay before the first retry.
    pub first: Duration,
    /// Maximum delay cap for retries.
    pub max: Duration,
    /// Multiplicative growth factor (`>= 1.0` recommended).
    pub factor: f64,
    /// Jitter policy to spread synchronized retries apart.
    pub jitter: JitterPolicy,
}

impl Default for BackoffPolicy {
    /// Returns a gentle schedule:
    /// - `first = 50ms`
    /// - `max = 5s`
    /// - `factor = 2.0`
    /// - `jitter = JitterPolicy::Equal`
    fn default() -> Self {
        Self {
            first: Duration::from_millis(50),
            max: Duration::from_secs(5),
            factor: 2.0,
            jitter: JitterPolicy::Equal,
        }
    }
}

impl BackoffPolicy {
    /// Computes the delay for the given attempt number (0-indexed).
    ///
    /// The base delay is `first × factor^attempt`, clamped to
    /// [`BackoffPolicy::max`]; non-finite or negative intermediate values also
    /// clamp to the cap. Jitter is applied to the clamped base.
    pub fn next(&self, attempt: u32) -> Duration {
        let max_secs = self.max.as_secs_f64();
        let clamped_exp = attempt.min(i32::MAX as u32) as i32;
        let unclamped_secs = self.first.as_secs_f64() * self.factor.powi(clamped_exp);

        let base =
            if !unclamped_secs.is_finite() || unclamped_secs < 0.0 || unclamped_secs > max_secs {
                self.max
            } else {
                Duration::from_secs_f64(unclamped_secs)
            };

        self.jitter.apply(base)
    }
}
