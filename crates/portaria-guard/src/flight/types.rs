//! Types and timeout tiers for single-flight operations.

use std::time::Duration;

/// Default timeout for generic resource fetches.
pub const DEFAULT_FLIGHT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Session validation fails fast so navigation never stalls on a dead token.
pub const SESSION_FLIGHT_TIMEOUT: Duration = Duration::from_millis(3000);

/// Multi-step creation flows (profile plus role bootstrap) get more headroom.
pub const CREATION_FLIGHT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Errors delivered to flight waiters.
///
/// `Clone` because one settlement is broadcast to every attached caller.
/// The three kinds stay distinguishable so callers can tell an operation's
/// own failure from the manager timing it out or cancelling it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlightError {
    /// The wrapped operation itself failed; its message is preserved.
    #[error("flight operation failed: {message}")]
    OperationFailed { message: String },

    /// The per-key timeout fired before the operation settled.
    #[error("flight timed out after {waited_ms}ms")]
    Timeout { waited_ms: u64 },

    /// The flight was cancelled (logout or administrative reset).
    #[error("flight cancelled")]
    Cancelled,
}

impl FlightError {
    /// Wraps an operation's own error, preserving its message.
    pub fn operation(err: impl std::fmt::Display) -> Self {
        FlightError::OperationFailed {
            message: err.to_string(),
        }
    }

    /// Whether this is the manager-generated timeout error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, FlightError::Timeout { .. })
    }

    /// Whether this is the manager-generated cancellation error.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FlightError::Cancelled)
    }
}

/// Result type for flight operations.
pub type FlightResult<T> = Result<T, FlightError>;
