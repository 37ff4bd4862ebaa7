//! Domain error types for route resolution.
//!
//! Note that route resolution itself never fails: every context snapshot
//! maps to a decision, with contradictory snapshots resolving to the error
//! state and a safe redirect. The errors below only arise while building a
//! route table from configuration.

use thiserror::Error;

/// Domain-specific errors for route resolution setup.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A route prefix is empty, not absolute, or has a trailing slash.
    #[error("invalid route prefix: {value:?} (prefixes must start with '/' and not end with one)")]
    InvalidRoutePrefix { value: String },

    /// A prefix was listed as both public and role-protected.
    #[error("route prefix {value:?} is listed as both public and role-protected")]
    ConflictingRouteClass { value: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
