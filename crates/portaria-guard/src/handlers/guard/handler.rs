//! Route guard handler implementation.

use std::sync::Arc;

use portaria_domain::resolver::{
    AuthContext, AuthResolver, RoleAssignment, RouteResolution, UserProfile,
};
use tracing::debug;

use crate::flight::SingleFlight;

use super::types::{GuardResult, ProfileReader, RoleReader, RouteQuery};

/// Guards navigations by resolving a fresh context snapshot per query.
///
/// Profile and role fetches go through per-user single-flight registries:
/// overlapping navigations for the same user share one fetch each. The
/// handler owns all flight state; host code only supplies the readers and
/// the resolver configuration.
pub struct GuardHandler<P, R>
where
    P: ProfileReader,
    R: RoleReader,
{
    /// The resolver for computing route decisions.
    resolver: AuthResolver,
    /// Profile data access.
    profiles: Arc<P>,
    /// Role data access.
    roles: Arc<R>,
    /// Single-flight registry for profile fetches, keyed "profile:{user_id}".
    profile_flights: SingleFlight<String, Option<UserProfile>>,
    /// Single-flight registry for role fetches, keyed "roles:{user_id}".
    role_flights: SingleFlight<String, Vec<RoleAssignment>>,
}

impl<P, R> GuardHandler<P, R>
where
    P: ProfileReader + 'static,
    R: RoleReader + 'static,
{
    /// Creates a guard handler.
    pub fn new(resolver: AuthResolver, profiles: Arc<P>, roles: Arc<R>) -> Self {
        Self {
            resolver,
            profiles,
            roles,
            profile_flights: SingleFlight::new(),
            role_flights: SingleFlight::new(),
        }
    }

    /// The resolver in use.
    pub fn resolver(&self) -> &AuthResolver {
        &self.resolver
    }

    /// Resolves a navigation to a route decision.
    ///
    /// Sessions without a valid token or identity resolve immediately with
    /// no data fetches. Otherwise the profile row and role grants load
    /// concurrently through their single-flight registries before the
    /// resolver evaluates the assembled snapshot.
    pub async fn resolve_route(&self, query: RouteQuery) -> GuardResult<RouteResolution> {
        // Anonymous snapshots never need fresh data.
        let user = match query.user {
            Some(user) if query.has_valid_token => user,
            user => {
                let context = AuthContext {
                    has_valid_token: query.has_valid_token,
                    user,
                    profile: None,
                    roles: Vec::new(),
                    current_path: query.current_path,
                };
                return Ok(self.resolver.resolve(&context));
            }
        };

        let profile_key = format!("profile:{}", user.id);
        let roles_key = format!("roles:{}", user.id);
        debug!(user_id = %user.id, path = %query.current_path, "assembling auth snapshot");

        let profiles = Arc::clone(&self.profiles);
        let profile_user_id = user.id.clone();
        let profile_fut = self.profile_flights.execute(profile_key, move || async move {
            profiles.load_profile(&profile_user_id).await
        });

        let roles = Arc::clone(&self.roles);
        let roles_user_id = user.id.clone();
        let roles_fut = self.role_flights.execute(roles_key, move || async move {
            roles.load_roles(&roles_user_id).await
        });

        let (profile, role_rows) = futures::try_join!(profile_fut, roles_fut)?;
        let context = AuthContext {
            has_valid_token: true,
            user: Some(user),
            profile,
            roles: role_rows,
            current_path: query.current_path,
        };
        Ok(self.resolver.resolve(&context))
    }

    /// Cancels any pending fetches for a user, releasing all waiters.
    ///
    /// Call on logout so navigations blocked on a dead session fail fast
    /// instead of waiting out the flight timeout.
    pub fn invalidate(&self, user_id: &str) {
        let cancelled_profile = self.profile_flights.cancel(&format!("profile:{user_id}"));
        let cancelled_roles = self.role_flights.cancel(&format!("roles:{user_id}"));
        if cancelled_profile || cancelled_roles {
            debug!(user_id, "cancelled pending fetches for user");
        }
    }

    /// Cancels every pending fetch. Reserved for recovery tooling.
    pub fn reset(&self) {
        self.profile_flights.cancel_all();
        self.role_flights.cancel_all();
    }
}
