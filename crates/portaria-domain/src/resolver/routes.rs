//! Route classification for the decision table.
//!
//! Membership in the public and role-protected sets is static configuration
//! (prefix-match lists), never derived from auth state. Classification is
//! O(number of configured prefixes).

use crate::error::{DomainError, DomainResult};

/// Login flow entry point.
pub const AUTH_PATH: &str = "/auth";
/// Onboarding flow entry point.
pub const ONBOARDING_PATH: &str = "/onboarding";
/// Safe landing page for contradictory snapshots.
pub const DASHBOARD_PATH: &str = "/dashboard";
/// Landing page for role-denied navigations.
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// Route prefixes reachable without a session.
pub const DEFAULT_PUBLIC_PREFIXES: &[&str] = &["/", "/auth", "/privacy", "/terms"];

/// Route prefixes requiring at least one active role grant.
pub const DEFAULT_PROTECTED_PREFIXES: &[&str] =
    &["/clients", "/schedule", "/records", "/team", "/settings"];

/// Class of a requested route, as seen by the decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteClass {
    /// Reachable without a session.
    Public,
    /// The onboarding flow itself.
    Onboarding,
    /// Requires an active role grant.
    RoleProtected,
    /// Any other authenticated route.
    Other,
}

/// Static prefix-match sets classifying the application's routes.
///
/// A prefix of `"/"` matches only the root path; any other prefix matches
/// itself or itself followed by a `/`-separated suffix, so `/clients`
/// covers `/clients/42` but not `/clientsfoo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    public_prefixes: Vec<String>,
    protected_prefixes: Vec<String>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            public_prefixes: DEFAULT_PUBLIC_PREFIXES
                .iter()
                .map(ToString::to_string)
                .collect(),
            protected_prefixes: DEFAULT_PROTECTED_PREFIXES
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl RouteTable {
    /// Creates a route table from configured prefix lists.
    ///
    /// Every prefix must start with `/` and (except for the root prefix)
    /// must not end with one. A prefix listed in both sets is rejected:
    /// a route cannot be both public and role-protected.
    pub fn new(
        public_prefixes: Vec<String>,
        protected_prefixes: Vec<String>,
    ) -> DomainResult<Self> {
        for prefix in public_prefixes.iter().chain(protected_prefixes.iter()) {
            if !Self::is_valid_prefix(prefix) {
                return Err(DomainError::InvalidRoutePrefix {
                    value: prefix.clone(),
                });
            }
        }
        if let Some(conflict) = public_prefixes
            .iter()
            .find(|prefix| protected_prefixes.contains(prefix))
        {
            return Err(DomainError::ConflictingRouteClass {
                value: conflict.clone(),
            });
        }
        Ok(Self {
            public_prefixes,
            protected_prefixes,
        })
    }

    /// Classifies a path against the configured sets.
    ///
    /// Precedence: onboarding, public, role-protected, other. The
    /// onboarding flow has its own decision-table column and therefore
    /// never appears in the configured sets.
    pub fn classify(&self, path: &str) -> RouteClass {
        if Self::prefix_matches(ONBOARDING_PATH, path) {
            return RouteClass::Onboarding;
        }
        if self
            .public_prefixes
            .iter()
            .any(|prefix| Self::prefix_matches(prefix, path))
        {
            return RouteClass::Public;
        }
        if self
            .protected_prefixes
            .iter()
            .any(|prefix| Self::prefix_matches(prefix, path))
        {
            return RouteClass::RoleProtected;
        }
        RouteClass::Other
    }

    /// The configured public prefixes.
    pub fn public_prefixes(&self) -> &[String] {
        &self.public_prefixes
    }

    /// The configured role-protected prefixes.
    pub fn protected_prefixes(&self) -> &[String] {
        &self.protected_prefixes
    }

    fn is_valid_prefix(prefix: &str) -> bool {
        if prefix == "/" {
            return true;
        }
        prefix.len() > 1 && prefix.starts_with('/') && !prefix.ends_with('/')
    }

    fn prefix_matches(prefix: &str, path: &str) -> bool {
        if prefix == "/" {
            return path == "/";
        }
        path == prefix
            || (path.starts_with(prefix) && path.as_bytes().get(prefix.len()) == Some(&b'/'))
    }
}
