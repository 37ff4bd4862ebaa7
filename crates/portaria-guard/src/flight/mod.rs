//! Single-flight coordination for data fetches.
//!
//! When several parts of the application concurrently need the same remote
//! resource (the same user's profile, the same role list), only one fetch
//! should actually run; everyone else attaches to it and receives the same
//! outcome. This module provides that guarantee per resource key:
//!
//! 1. **One execution per flight**: the wrapped operation runs exactly once
//!    between "no flight" and "flight settled", no matter how many callers
//!    join.
//! 2. **Shared outcome**: every attached caller observes the identical
//!    result or error.
//! 3. **Bounded waiting**: a per-key timeout guarantees forward progress;
//!    a flight never waits forever.
//! 4. **Independent keys**: flights for different keys never block each
//!    other, and no cross-key ordering is implied.
//!
//! Timeouts and explicit cancellation free the key immediately, so a retry
//! can start a fresh attempt without waiting for the abandoned operation.

mod manager;
mod types;

pub use manager::SingleFlight;
pub use types::{
    FlightError, FlightResult, CREATION_FLIGHT_TIMEOUT, DEFAULT_FLIGHT_TIMEOUT,
    SESSION_FLIGHT_TIMEOUT,
};
