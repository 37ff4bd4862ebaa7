//! Route guard handler.
//!
//! On every navigation the host application holds only the session facts
//! (token validity, user identity, requested path). The guard handler
//! fetches the rest of the snapshot - profile row and role grants - through
//! single-flight registries, so overlapping navigations for the same user
//! trigger exactly one profile fetch and one role fetch, then runs a fresh
//! resolver evaluation over the assembled context.
//!
//! Loader failures and flight timeouts propagate to the caller; the guard
//! does not retry (retry policy belongs to the navigation layer). A logout
//! while fetches are pending should call [`GuardHandler::invalidate`] to
//! release every waiter immediately.

mod handler;
mod types;

pub use handler::GuardHandler;
pub use types::{GuardError, GuardResult, ProfileReader, RoleReader, RouteQuery};
