//! Auth service - sign-in, sign-up and password maintenance
//!
//! Thin orchestration over the auth provider: sign-up additionally writes the
//! profile record for the new account, and password changes require a fresh
//! proof of the current password.

use std::sync::Arc;

use serde_json::json;

use crate::domain::result::Result;
use crate::domain::AuthUser;
use crate::ports::{AuthProvider, DocumentStore};

use super::wire::now_ms;

const USERS_COLLECTION: &str = "users";

#[derive(Clone)]
pub struct AuthService {
    auth: Arc<dyn AuthProvider>,
    store: Arc<dyn DocumentStore>,
}

impl AuthService {
    pub fn new(auth: Arc<dyn AuthProvider>, store: Arc<dyn DocumentStore>) -> Self {
        Self { auth, store }
    }

    pub fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser> {
        self.auth.sign_in(email, password)
    }

    /// Self-service registration: credential plus a regular (non-admin)
    /// profile record
    ///
    /// If the profile write fails the credential is kept; the session
    /// listener tolerates a missing profile, and a later sign-in still works.
    pub fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<AuthUser> {
        let user = self.auth.sign_up(email, password)?;
        let profile = json!({
            "name": name,
            "email": email,
            "isAdmin": false,
            "createdAt": now_ms(),
        });
        self.store.set(USERS_COLLECTION, &user.uid, profile)?;
        Ok(user)
    }

    pub fn sign_out(&self) -> Result<()> {
        self.auth.sign_out()
    }

    /// Change the signed-in user's password after re-proving the current one
    pub fn update_password(
        &self,
        email: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<()> {
        self.auth.reauthenticate(email, current_password)?;
        self.auth.update_password(new_password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryBackend;
    use crate::domain::result::Error;
    use crate::ports::Filter;

    fn service() -> (Arc<MemoryBackend>, AuthService) {
        let backend = Arc::new(MemoryBackend::new());
        let service = AuthService::new(backend.clone(), backend.clone());
        (backend, service)
    }

    #[test]
    fn test_sign_up_creates_regular_profile() {
        let (backend, service) = service();
        let user = service
            .sign_up("Ana Souza", "ana@example.com", "secret1")
            .unwrap();

        let doc = backend.get("users", &user.uid).unwrap().unwrap();
        assert_eq!(doc.fields["name"], "Ana Souza");
        assert_eq!(doc.fields["isAdmin"], false);
        assert_eq!(backend.current_user().unwrap().uid, user.uid);
    }

    #[test]
    fn test_sign_in_with_wrong_password_fails() {
        let (_, service) = service();
        service
            .sign_up("Ana Souza", "ana@example.com", "secret1")
            .unwrap();
        service.sign_out().unwrap();

        let err = service.sign_in("ana@example.com", "nope").unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
    }

    #[test]
    fn test_update_password_requires_current_one() {
        let (_, service) = service();
        service
            .sign_up("Ana Souza", "ana@example.com", "secret1")
            .unwrap();

        let err = service
            .update_password("ana@example.com", "wrong", "secret2")
            .unwrap_err();
        assert!(matches!(err, Error::Auth(_)));

        service
            .update_password("ana@example.com", "secret1", "secret2")
            .unwrap();
        service.sign_out().unwrap();
        assert!(service.sign_in("ana@example.com", "secret2").is_ok());
    }

    #[test]
    fn test_sign_up_rejects_taken_email() {
        let (backend, service) = service();
        service
            .sign_up("Ana Souza", "ana@example.com", "secret1")
            .unwrap();
        let err = service
            .sign_up("Other", "ana@example.com", "secret2")
            .unwrap_err();
        assert!(matches!(err, Error::Auth(_)));

        // Only the first profile exists
        let hits = backend
            .query(
                "users",
                &Filter::Eq {
                    field: "email".to_string(),
                    value: serde_json::json!("ana@example.com"),
                },
            )
            .unwrap();
        assert_eq!(hits.len(), 1);
    }
}
