//! User domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An application account
///
/// The identifier equals the auth provider's subject id; the profile document
/// in the store is keyed by it (1:1). Email is only settable at signup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Explicit per-field update for a user profile
///
/// Email is immutable after creation, so it does not appear here.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub is_admin: Option<bool>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.is_admin.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_is_empty() {
        assert!(UserUpdate::default().is_empty());
        assert!(!UserUpdate {
            name: None,
            is_admin: Some(true)
        }
        .is_empty());
    }

    #[test]
    fn test_user_serde_field_names() {
        let user = User {
            id: "uid-1".to_string(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            is_admin: true,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["isAdmin"], serde_json::json!(true));
        assert!(json.get("createdAt").is_some());
    }
}
