//! portaria-guard: Coordination layer around the auth resolver
//!
//! This crate contains the asynchronous plumbing the pure resolver needs to
//! run inside an application:
//! - Single-flight deduplication of concurrent data fetches
//! - Route-guard handler wiring fetches into resolver evaluations
//! - Configuration management
//! - Structured-logging bootstrap
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               portaria-guard                 │
//! ├─────────────────────────────────────────────┤
//! │  config.rs   - Configuration management     │
//! │  logging.rs  - tracing-subscriber bootstrap │
//! │  flight/     - Single-flight manager        │
//! │  handlers/   - Route guard handler          │
//! │    guard/        - snapshot + resolve       │
//! └─────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod flight;
pub mod handlers;
pub mod logging;

// Re-exports for convenience
pub use config::{ConfigLoadError, GuardConfig};
pub use flight::{FlightError, SingleFlight};
pub use handlers::guard::{GuardError, GuardHandler, ProfileReader, RoleReader, RouteQuery};
