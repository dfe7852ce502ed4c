//! Error types used by the station core and the fleet runtime.
//!
//! This module defines two main error enums:
//!
//! - [`StationError`] — errors raised by individual station operations.
//! - [`FleetError`] — errors raised by the fleet runtime itself.
//!
//! Capacity that is merely unavailable right now is **never** an error:
//! blocking operations wait, `try_*` operations report `Ok(false)`. Errors are
//! reserved for requests that can never succeed ([`StationError::InvalidRequest`]),
//! caller bugs ([`StationError::ProtocolViolation`]), and interrupted waits
//! ([`StationError::Cancelled`]).

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by the fleet runtime.
///
/// These represent failures in the orchestration layer, such as a shutdown
/// sequence exceeding its grace period.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum FleetError {
    /// Shutdown grace period was exceeded; some actors remained stuck and had to be abandoned.
    #[error("shutdown grace {grace:?} exceeded; {running} actor(s) still running")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Number of actors that did not stop in time.
        running: usize,
    },
}

impl FleetError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use fuelbay::FleetError;
    /// use std::time::Duration;
    ///
    /// let err = FleetError::GraceExceeded { grace: Duration::from_secs(5), running: 2 };
    /// assert_eq!(err.as_label(), "fleet_grace_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            FleetError::GraceExceeded { .. } => "fleet_grace_exceeded",
        }
    }
}

/// # Errors produced by station operations.
///
/// A blocking wait on a reservoir or the slot pool is not represented here;
/// only outcomes that the caller must handle explicitly are.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StationError {
    /// Requested amount exceeds the target reservoir's total capacity.
    ///
    /// Such a request can never be satisfied, so it is rejected immediately
    /// instead of blocking forever.
    #[error("requested {requested} exceeds reservoir capacity {capacity}")]
    InvalidRequest {
        /// The amount that was requested.
        requested: u32,
        /// The reservoir's fixed capacity.
        capacity: u32,
    },

    /// Operation on an already-ended docking handle, or a similar misuse of
    /// the docking protocol. A bug in the calling code, never retried.
    #[error("docking protocol violation: {reason}")]
    ProtocolViolation {
        /// What the caller did wrong.
        reason: &'static str,
    },

    /// A blocking wait was interrupted by cancellation or station shutdown.
    #[error("operation cancelled")]
    Cancelled,
}

impl StationError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use fuelbay::StationError;
    ///
    /// let err = StationError::InvalidRequest { requested: 500, capacity: 100 };
    /// assert_eq!(err.as_label(), "invalid_request");
    /// assert_eq!(StationError::Cancelled.as_label(), "cancelled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            StationError::InvalidRequest { .. } => "invalid_request",
            StationError::ProtocolViolation { .. } => "protocol_violation",
            StationError::Cancelled => "cancelled",
        }
    }

    /// Indicates whether the error is a graceful stop rather than a fault.
    ///
    /// Returns `true` only for [`StationError::Cancelled`]: a cancelled actor
    /// simply observed shutdown, while the other variants are caller bugs.
    pub fn is_graceful(&self) -> bool {
        matches!(self, StationError::Cancelled)
    }
}
