//! portaria-domain: Core auth/onboarding route resolution logic
//!
//! This crate contains the pure decision logic of the portaria gatekeeper:
//! - Auth context snapshot types (session, profile, role records)
//! - Auth state determination (ordered, short-circuiting checks)
//! - Route classification and the state x route-class decision table
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               portaria-domain                │
//! ├─────────────────────────────────────────────┤
//! │  resolver/   - Auth state & route decisions │
//! │  error.rs    - Domain error types           │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Everything here is synchronous and deterministic: a context snapshot in,
//! a route resolution out, no I/O and no hidden state. The asynchronous
//! coordination around it (single-flight fetches, configuration loading)
//! lives in `portaria-guard`.

pub mod error;
pub mod resolver;

// Re-export commonly used types at the crate root
pub use error::{DomainError, DomainResult};
pub use resolver::{determine_auth_route, AuthContext, AuthResolver, RouteResolution};
