//! Auth state and route decision resolution.
//!
//! The resolver maps an immutable context snapshot (token validity, user
//! identity, profile row, role rows, requested path) to a single navigation
//! outcome: allow, redirect to login, redirect to onboarding, deny, or the
//! safe dashboard fallback.
//!
//! # Design
//!
//! - **Ordered state checks**: the auth state is computed by short-circuiting
//!   checks whose order is a correctness invariant, not a style choice. The
//!   token check dominates everything else; a missing profile forces
//!   re-authentication rather than guessing onboarding intent.
//!
//! - **Exhaustive decision table**: the state x route-class mapping is a
//!   single exhaustive `match`, so adding a state or a route class is a
//!   compile error until every cell is decided.
//!
//! - **Never fails**: contradictory snapshots resolve to [`AuthState::ErrorState`]
//!   and a redirect to the dashboard. The caller always gets somewhere
//!   navigable; anomalies surface through `tracing`, not through `Result`.

mod auth_resolver;
mod config;
mod routes;
mod traits;
mod types;

pub use auth_resolver::{determine_auth_route, AuthResolver};
pub use config::ResolverConfig;
pub use routes::{
    RouteClass, RouteTable, AUTH_PATH, DASHBOARD_PATH, DEFAULT_PROTECTED_PREFIXES,
    DEFAULT_PUBLIC_PREFIXES, ONBOARDING_PATH, UNAUTHORIZED_PATH,
};
pub use traits::OnboardingProbe;
pub use types::{
    AuthContext, AuthState, RoleAssignment, RouteDecision, RouteResolution, UserIdentity,
    UserProfile,
};

#[cfg(test)]
mod tests;
