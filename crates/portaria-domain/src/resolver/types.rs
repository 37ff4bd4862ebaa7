//! Types for auth route resolution.

use std::fmt;

use serde::Deserialize;

/// Identity of the authenticated user as reported by the session provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserIdentity {
    /// Stable user id issued by the auth provider.
    pub id: String,
    /// Login email, when the provider reports one.
    pub email: Option<String>,
}

impl UserIdentity {
    /// Creates an identity without an email.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
        }
    }

    /// Creates an identity with an email.
    pub fn with_email(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: Some(email.into()),
        }
    }
}

/// Profile row for a user.
///
/// Field names keep the upstream column names on the wire (the backing
/// tables predate this crate), mapped to idiomatic names in code.
/// `first_access` is the authoritative onboarding-incomplete flag: true
/// until onboarding is marked complete.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(rename = "nome_completo")]
    pub full_name: String,
    pub email: String,
    #[serde(rename = "primeiro_acesso")]
    pub first_access: bool,
    #[serde(rename = "ativo")]
    pub active: bool,
}

impl UserProfile {
    /// Creates a profile as the backend inserts it for a brand-new user:
    /// onboarding pending, account active.
    pub fn new(
        id: impl Into<String>,
        full_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
            email: email.into(),
            first_access: true,
            active: true,
        }
    }

    /// Sets the onboarding-incomplete flag.
    pub fn with_first_access(mut self, first_access: bool) -> Self {
        self.first_access = first_access;
        self
    }

    /// Sets the active flag.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

/// One role grant for a user, optionally scoped to a clinic.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoleAssignment {
    /// Role name (e.g. "owner", "professional", "receptionist").
    pub role: String,
    #[serde(rename = "ativo")]
    pub active: bool,
    #[serde(rename = "clinica_id")]
    pub clinic_id: Option<String>,
}

impl RoleAssignment {
    /// Creates an active, unscoped role grant.
    pub fn new(role: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            active: true,
            clinic_id: None,
        }
    }

    /// Creates an active role grant scoped to a clinic.
    pub fn for_clinic(role: impl Into<String>, clinic_id: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            active: true,
            clinic_id: Some(clinic_id.into()),
        }
    }

    /// Creates a revoked (inactive) role grant.
    pub fn inactive(role: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            active: false,
            clinic_id: None,
        }
    }
}

/// Immutable snapshot evaluated on every navigation.
///
/// Insertion order of `roles` is irrelevant; only the presence of at least
/// one active grant matters to the decision table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Whether the session token is present and unexpired.
    pub has_valid_token: bool,
    /// The authenticated identity, if any.
    pub user: Option<UserIdentity>,
    /// The profile row, if one has been created for this user.
    pub profile: Option<UserProfile>,
    /// Role grants for this user.
    pub roles: Vec<RoleAssignment>,
    /// The path being navigated to.
    pub current_path: String,
}

impl AuthContext {
    /// Creates the snapshot of a visitor with no session.
    pub fn anonymous(current_path: impl Into<String>) -> Self {
        Self {
            has_valid_token: false,
            user: None,
            profile: None,
            roles: Vec::new(),
            current_path: current_path.into(),
        }
    }

    /// Sets the token validity flag.
    pub fn with_valid_token(mut self, has_valid_token: bool) -> Self {
        self.has_valid_token = has_valid_token;
        self
    }

    /// Attaches the authenticated identity.
    pub fn with_user(mut self, user: UserIdentity) -> Self {
        self.user = Some(user);
        self
    }

    /// Attaches the profile row.
    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Attaches the role grants.
    pub fn with_roles(mut self, roles: Vec<RoleAssignment>) -> Self {
        self.roles = roles;
        self
    }

    /// Whether at least one role grant is active.
    pub fn has_active_role(&self) -> bool {
        self.roles.iter().any(|role| role.active)
    }
}

/// Computed authentication lifecycle state.
///
/// `ErrorState` is a defensive fallback for contradictory snapshots; it is
/// never an intended target under correct rule ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthState {
    /// No valid session, or a session with no profile row.
    Anonymous,
    /// Authenticated, onboarding not yet started or not yet finished.
    AuthenticatedNew,
    /// Authenticated, mid-onboarding (transient persistence marker set).
    OnboardingInProgress,
    /// Authenticated and fully onboarded.
    AuthenticatedExisting,
    /// Contradictory snapshot; resolved to a safe redirect.
    ErrorState,
}

impl AuthState {
    /// Stable wire/log name for the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthState::Anonymous => "ANONYMOUS",
            AuthState::AuthenticatedNew => "AUTHENTICATED_NEW",
            AuthState::OnboardingInProgress => "ONBOARDING_IN_PROGRESS",
            AuthState::AuthenticatedExisting => "AUTHENTICATED_EXISTING",
            AuthState::ErrorState => "ERROR_STATE",
        }
    }
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Navigation outcome for a context snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteDecision {
    /// Render the requested route.
    AllowAccess,
    /// Send the visitor to the login flow.
    RedirectAuth,
    /// Send the user to the onboarding flow.
    RedirectOnboarding,
    /// The user lacks an active role for a role-protected route.
    DenyAccess,
    /// Safe fallback for contradictory snapshots.
    RedirectDashboard,
}

impl RouteDecision {
    /// Stable wire/log name for the decision.
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteDecision::AllowAccess => "ALLOW_ACCESS",
            RouteDecision::RedirectAuth => "REDIRECT_AUTH",
            RouteDecision::RedirectOnboarding => "REDIRECT_ONBOARDING",
            RouteDecision::DenyAccess => "DENY_ACCESS",
            RouteDecision::RedirectDashboard => "REDIRECT_DASHBOARD",
        }
    }
}

impl fmt::Display for RouteDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of resolving a context snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteResolution {
    /// The computed auth state.
    pub state: AuthState,
    /// The navigation outcome.
    pub decision: RouteDecision,
    /// Human-readable explanation, always populated.
    pub reason: String,
    /// Where to send the user; present for every non-allow outcome.
    pub redirect_path: Option<String>,
}

impl RouteResolution {
    /// Creates an allow resolution.
    pub fn allow(state: AuthState, reason: impl Into<String>) -> Self {
        Self {
            state,
            decision: RouteDecision::AllowAccess,
            reason: reason.into(),
            redirect_path: None,
        }
    }

    /// Creates a redirect/deny resolution pointing at `redirect_path`.
    pub fn redirect(
        state: AuthState,
        decision: RouteDecision,
        reason: impl Into<String>,
        redirect_path: impl Into<String>,
    ) -> Self {
        Self {
            state,
            decision,
            reason: reason.into(),
            redirect_path: Some(redirect_path.into()),
        }
    }
}
