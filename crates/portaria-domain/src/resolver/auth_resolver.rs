//! Deterministic resolution of context snapshots to route decisions.

use std::time::Instant;

use tracing::warn;

use super::config::ResolverConfig;
use super::routes::{RouteClass, AUTH_PATH, DASHBOARD_PATH, ONBOARDING_PATH, UNAUTHORIZED_PATH};
use super::types::{AuthContext, AuthState, RouteDecision, RouteResolution};

/// Resolves context snapshots into navigation outcomes.
///
/// The resolver holds only static configuration; identical snapshots always
/// produce identical resolutions. Construct one per application and share
/// it, or use [`determine_auth_route`] for the default configuration.
#[derive(Debug, Clone, Default)]
pub struct AuthResolver {
    config: ResolverConfig,
}

impl AuthResolver {
    /// Creates a resolver with the given configuration.
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves a snapshot to a navigation outcome.
    ///
    /// Never fails: contradictory snapshots resolve to the error state and
    /// a dashboard redirect.
    pub fn resolve(&self, context: &AuthContext) -> RouteResolution {
        let started = Instant::now();
        let state = self.determine_state(context);
        let resolution = self.decide(state, context);
        let elapsed = started.elapsed();
        if elapsed > self.config.slow_eval_threshold {
            warn!(
                elapsed_us = elapsed.as_micros() as u64,
                path = %context.current_path,
                "route evaluation exceeded slow threshold"
            );
        }
        resolution
    }

    /// Computes the auth state with ordered, short-circuiting checks.
    ///
    /// The order is a correctness invariant: the token check dominates every
    /// other field, and a session without a profile row re-authenticates
    /// instead of guessing onboarding intent.
    fn determine_state(&self, context: &AuthContext) -> AuthState {
        if !context.has_valid_token {
            return AuthState::Anonymous;
        }
        if context.user.is_some() && context.profile.is_none() {
            return AuthState::Anonymous;
        }
        let Some(profile) = &context.profile else {
            // Valid token with neither user nor profile.
            warn!(path = %context.current_path, "valid token without user or profile");
            return AuthState::ErrorState;
        };
        if let Some(probe) = &self.config.onboarding_probe {
            if probe.onboarding_in_progress(profile) {
                return AuthState::OnboardingInProgress;
            }
        }
        if profile.first_access {
            return AuthState::AuthenticatedNew;
        }
        // Role grants are not required here: an onboarded, active profile
        // is an existing user even with zero roles. Roles only gate
        // role-protected routes.
        if profile.active {
            return AuthState::AuthenticatedExisting;
        }
        warn!(
            profile_id = %profile.id,
            path = %context.current_path,
            "profile is onboarded but inactive"
        );
        AuthState::ErrorState
    }

    /// Maps (state, route class) to a decision.
    fn decide(&self, state: AuthState, context: &AuthContext) -> RouteResolution {
        let class = self.config.route_table.classify(&context.current_path);
        match (state, class) {
            (state, RouteClass::Public) => {
                RouteResolution::allow(state, "public route, reachable in any state")
            }

            (AuthState::Anonymous, _) => RouteResolution::redirect(
                state,
                RouteDecision::RedirectAuth,
                "no authenticated session, sign-in required",
                AUTH_PATH,
            ),

            (
                AuthState::AuthenticatedNew | AuthState::OnboardingInProgress,
                RouteClass::Onboarding,
            ) => RouteResolution::allow(state, "onboarding route requested during onboarding"),
            (AuthState::AuthenticatedNew | AuthState::OnboardingInProgress, _) => {
                RouteResolution::redirect(
                    state,
                    RouteDecision::RedirectOnboarding,
                    "onboarding incomplete, setup must finish first",
                    ONBOARDING_PATH,
                )
            }

            (AuthState::AuthenticatedExisting, RouteClass::RoleProtected) => {
                if context.has_active_role() {
                    RouteResolution::allow(state, "active role grant covers protected route")
                } else {
                    RouteResolution::redirect(
                        state,
                        RouteDecision::DenyAccess,
                        "no active role grant for protected route",
                        UNAUTHORIZED_PATH,
                    )
                }
            }
            // Re-entering the onboarding flow after completion is harmless.
            (AuthState::AuthenticatedExisting, _) => {
                RouteResolution::allow(state, "onboarded user on unrestricted route")
            }

            (AuthState::ErrorState, _) => RouteResolution::redirect(
                state,
                RouteDecision::RedirectDashboard,
                "contradictory auth snapshot, falling back to dashboard",
                DASHBOARD_PATH,
            ),
        }
    }
}

/// Resolves a snapshot using the default configuration.
///
/// Convenience entry point for callers that do not customize routes or the
/// onboarding probe; equivalent to `AuthResolver::default().resolve(context)`.
pub fn determine_auth_route(context: &AuthContext) -> RouteResolution {
    AuthResolver::default().resolve(context)
}
