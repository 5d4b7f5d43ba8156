//! User service - administration of profile records
//!
//! Profiles live in the `users` collection, keyed by the auth uid. Creating a
//! user is a two-step operation (credential, then profile); when the profile
//! write fails the freshly created credential is deleted on a best-effort
//! basis so no orphaned login is left behind.

use std::sync::Arc;

use serde_json::json;

use crate::domain::result::{Error, Result};
use crate::domain::{User, UserUpdate};
use crate::ports::{AuthProvider, Document, DocumentStore, Filter};

use super::wire::{now_ms, read_instant, read_string};

const COLLECTION: &str = "users";

/// Service for listing and administering user accounts
#[derive(Clone)]
pub struct UserService {
    auth: Arc<dyn AuthProvider>,
    store: Arc<dyn DocumentStore>,
}

impl UserService {
    pub fn new(auth: Arc<dyn AuthProvider>, store: Arc<dyn DocumentStore>) -> Self {
        Self { auth, store }
    }

    pub fn get_all(&self) -> Result<Vec<User>> {
        let documents = self.store.list(COLLECTION)?;
        Ok(documents.into_iter().map(decode).collect())
    }

    pub fn get_by_id(&self, id: &str) -> Result<User> {
        match self.store.get(COLLECTION, id)? {
            Some(document) => Ok(decode(document)),
            None => Err(Error::not_found(format!("user {}", id))),
        }
    }

    /// Patch name and/or the administrator flag
    pub fn update(&self, id: &str, update: &UserUpdate) -> Result<()> {
        let mut fields = serde_json::Map::new();
        if let Some(name) = &update.name {
            fields.insert("name".to_string(), json!(name));
        }
        if let Some(is_admin) = update.is_admin {
            fields.insert("isAdmin".to_string(), json!(is_admin));
        }
        if fields.is_empty() {
            return Ok(());
        }
        self.store
            .update(COLLECTION, id, serde_json::Value::Object(fields))
    }

    /// Remove the profile record
    ///
    /// The sign-in credential is not touched; revoking it requires
    /// provider-side administrative access.
    pub fn remove(&self, id: &str) -> Result<()> {
        self.store.delete(COLLECTION, id)
    }

    /// Create a credential and its profile record, returning the new uid
    ///
    /// The caller's own session is unaffected. If the profile write fails the
    /// credential is deleted again; when even that fails the original error
    /// is still the one reported.
    pub fn create(&self, name: &str, email: &str, password: &str, is_admin: bool) -> Result<String> {
        let credential = self.auth.create_user(email, password)?;
        let profile = json!({
            "name": name,
            "email": email,
            "isAdmin": is_admin,
            "createdAt": now_ms(),
        });
        if let Err(err) = self.store.set(COLLECTION, &credential.uid, profile) {
            let _ = self.auth.delete_credential(&credential);
            return Err(err);
        }
        Ok(credential.uid)
    }

    /// Whether a profile with this email already exists
    pub fn email_exists(&self, email: &str) -> Result<bool> {
        let hits = self.store.query(
            COLLECTION,
            &Filter::Eq {
                field: "email".to_string(),
                value: json!(email),
            },
        )?;
        Ok(!hits.is_empty())
    }
}

fn decode(document: Document) -> User {
    let fields = &document.fields;
    User {
        id: document.id,
        name: read_string(fields, "name"),
        email: read_string(fields, "email"),
        // Absent flag means a regular account
        is_admin: fields
            .get("isAdmin")
            .and_then(|v| v.as_bool())
            .unwrap_or(false),
        created_at: fields
            .get("createdAt")
            .and_then(read_instant)
            .unwrap_or_else(chrono::Utc::now),
    }
}
