//! Types and collaborator seams for the route guard.

use async_trait::async_trait;
use portaria_domain::resolver::{RoleAssignment, UserIdentity, UserProfile};

use crate::flight::FlightError;

/// Errors that can occur while guarding a navigation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GuardError {
    /// The profile loader failed.
    #[error("profile load failed: {message}")]
    ProfileLoad { message: String },

    /// The role loader failed.
    #[error("role load failed: {message}")]
    RoleLoad { message: String },

    /// A single-flight fetch failed, timed out, or was cancelled.
    #[error(transparent)]
    Flight(#[from] FlightError),
}

impl GuardError {
    /// Wraps a profile-loader error.
    pub fn profile_load(err: impl std::fmt::Display) -> Self {
        GuardError::ProfileLoad {
            message: err.to_string(),
        }
    }

    /// Wraps a role-loader error.
    pub fn role_load(err: impl std::fmt::Display) -> Self {
        GuardError::RoleLoad {
            message: err.to_string(),
        }
    }
}

/// Result type for guard operations.
pub type GuardResult<T> = Result<T, GuardError>;

/// Loads the profile row for a user. Implemented by the data-access layer.
#[async_trait]
pub trait ProfileReader: Send + Sync {
    /// Returns the profile row, or `None` when no row exists yet.
    async fn load_profile(&self, user_id: &str) -> GuardResult<Option<UserProfile>>;
}

/// Loads the role grants for a user. Implemented by the data-access layer.
#[async_trait]
pub trait RoleReader: Send + Sync {
    /// Returns every role grant for the user, active or not.
    async fn load_roles(&self, user_id: &str) -> GuardResult<Vec<RoleAssignment>>;
}

/// Session facts the host application already holds when a navigation occurs.
#[derive(Debug, Clone)]
pub struct RouteQuery {
    /// Whether the session token is present and unexpired.
    pub has_valid_token: bool,
    /// The authenticated identity, if any.
    pub user: Option<UserIdentity>,
    /// The path being navigated to.
    pub current_path: String,
}

impl RouteQuery {
    /// Creates a query for an authenticated session.
    pub fn new(user: UserIdentity, current_path: impl Into<String>) -> Self {
        Self {
            has_valid_token: true,
            user: Some(user),
            current_path: current_path.into(),
        }
    }

    /// Creates a query for a visitor with no session.
    pub fn anonymous(current_path: impl Into<String>) -> Self {
        Self {
            has_valid_token: false,
            user: None,
            current_path: current_path.into(),
        }
    }
}
