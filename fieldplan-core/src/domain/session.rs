//! Session domain model
//!
//! The session is transient and process-wide; the auth provider owns the
//! durable session state. These types describe what the session context
//! derives from auth-state notifications.

use serde::{Deserialize, Serialize};

/// Identity as reported by the auth provider (before profile merge)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub uid: String,
    pub email: Option<String>,
}

/// The current user with the profile document merged in
///
/// When no profile document exists for the uid, `name` is absent and
/// `is_admin` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub uid: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub is_admin: bool,
}

impl SessionUser {
    /// Fallback identity for a credential with no profile document
    pub fn without_profile(auth: &AuthUser) -> Self {
        Self {
            uid: auth.uid.clone(),
            email: auth.email.clone(),
            name: None,
            is_admin: false,
        }
    }
}

/// Lifecycle of the session context
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No auth-state event has been observed yet
    #[default]
    Uninitialized,
    /// Subscribed, waiting for the first event or resolving a profile lookup
    Loading,
    Authenticated(SessionUser),
    Unauthenticated,
}

impl SessionState {
    pub fn user(&self) -> Option<&SessionUser> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_profile_defaults() {
        let auth = AuthUser {
            uid: "u1".to_string(),
            email: Some("u1@example.com".to_string()),
        };
        let user = SessionUser::without_profile(&auth);
        assert_eq!(user.uid, "u1");
        assert!(!user.is_admin);
        assert!(user.name.is_none());
    }

    #[test]
    fn test_state_user_accessor() {
        assert!(SessionState::Unauthenticated.user().is_none());
        let user = SessionUser {
            uid: "u1".to_string(),
            email: None,
            name: None,
            is_admin: false,
        };
        assert!(SessionState::Authenticated(user).user().is_some());
    }
}
