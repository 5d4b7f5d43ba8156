//! In-memory backend
//!
//! Implements both ports against process-local state. Used as the demo-mode
//! backend and as the test double for every service test: same observable
//! semantics as the hosted backend (store-assigned ids, NotFound on missing
//! updates, auth-state notifications), no network.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::Value as JsonValue;

use crate::domain::result::{Error, Result};
use crate::domain::AuthUser;
use crate::ports::{
    AuthProvider, AuthStateListener, AuthStateNotifier, Credential, Document, DocumentStore,
    Filter, SubscriptionGuard,
};

/// Store-assigned ids are 20 alphanumeric characters
const DOCUMENT_ID_LEN: usize = 20;

struct MemoryCredential {
    uid: String,
    password: String,
}

/// Process-local backend implementing both the document store and the auth
/// provider
#[derive(Default)]
pub struct MemoryBackend {
    collections: Mutex<HashMap<String, BTreeMap<String, JsonValue>>>,
    credentials: Mutex<HashMap<String, MemoryCredential>>,
    current: Mutex<Option<AuthUser>>,
    notifier: AuthStateNotifier,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a credential without signing it in (used by demo seeding)
    pub fn register_credential(&self, email: &str, password: &str, uid: &str) {
        if let Ok(mut credentials) = self.credentials.lock() {
            credentials.insert(
                email.to_string(),
                MemoryCredential {
                    uid: uid.to_string(),
                    password: password.to_string(),
                },
            );
        }
    }

    fn generate_id() -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(DOCUMENT_ID_LEN)
            .map(char::from)
            .collect()
    }

    fn issue_credential(&self, email: &str, password: &str) -> Result<AuthUser> {
        let mut credentials = self
            .credentials
            .lock()
            .map_err(|_| Error::auth("credential registry poisoned"))?;
        if credentials.contains_key(email) {
            return Err(Error::auth("email is already in use"));
        }
        let uid = Self::generate_id();
        credentials.insert(
            email.to_string(),
            MemoryCredential {
                uid: uid.clone(),
                password: password.to_string(),
            },
        );
        Ok(AuthUser {
            uid,
            email: Some(email.to_string()),
        })
    }

    fn verify_credential(&self, email: &str, password: &str) -> Result<AuthUser> {
        let credentials = self
            .credentials
            .lock()
            .map_err(|_| Error::auth("credential registry poisoned"))?;
        match credentials.get(email) {
            Some(credential) if credential.password == password => Ok(AuthUser {
                uid: credential.uid.clone(),
                email: Some(email.to_string()),
            }),
            _ => Err(Error::auth("invalid email or password")),
        }
    }

    fn set_current(&self, user: Option<AuthUser>) {
        if let Ok(mut current) = self.current.lock() {
            *current = user.clone();
        }
        self.notifier.notify(user.as_ref());
    }

    fn timestamp_of(value: &JsonValue) -> Option<i64> {
        match value {
            JsonValue::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            _ => None,
        }
    }
}

impl DocumentStore for MemoryBackend {
    fn add(&self, collection: &str, fields: JsonValue) -> Result<String> {
        let id = Self::generate_id();
        self.set(collection, &id, fields)?;
        Ok(id)
    }

    fn set(&self, collection: &str, id: &str, fields: JsonValue) -> Result<()> {
        let mut collections = self
            .collections
            .lock()
            .map_err(|_| Error::store("store poisoned"))?;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
        Ok(())
    }

    fn update(&self, collection: &str, id: &str, fields: JsonValue) -> Result<()> {
        let mut collections = self
            .collections
            .lock()
            .map_err(|_| Error::store("store poisoned"))?;
        let existing = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| Error::not_found(format!("document {}/{}", collection, id)))?;

        if let (Some(target), Some(patch)) = (existing.as_object_mut(), fields.as_object()) {
            for (key, value) in patch {
                target.insert(key.clone(), value.clone());
            }
        }
        Ok(())
    }

    fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let mut collections = self
            .collections
            .lock()
            .map_err(|_| Error::store("store poisoned"))?;
        if let Some(docs) = collections.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }

    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let collections = self
            .collections
            .lock()
            .map_err(|_| Error::store("store poisoned"))?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document {
                id: id.to_string(),
                fields: fields.clone(),
            }))
    }

    fn list(&self, collection: &str) -> Result<Vec<Document>> {
        let collections = self
            .collections
            .lock()
            .map_err(|_| Error::store("store poisoned"))?;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| Document {
                        id: id.clone(),
                        fields: fields.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn query(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>> {
        let documents = self.list(collection)?;
        Ok(documents
            .into_iter()
            .filter(|doc| match filter {
                Filter::TimestampBetween {
                    field,
                    start_ms,
                    end_ms,
                } => doc
                    .fields
                    .get(field)
                    .and_then(Self::timestamp_of)
                    .map(|ts| ts >= *start_ms && ts <= *end_ms)
                    .unwrap_or(false),
                Filter::Eq { field, value } => doc.fields.get(field) == Some(value),
            })
            .collect())
    }
}

impl AuthProvider for MemoryBackend {
    fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser> {
        let user = self.verify_credential(email, password)?;
        self.set_current(Some(user.clone()));
        Ok(user)
    }

    fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser> {
        let user = self.issue_credential(email, password)?;
        self.set_current(Some(user.clone()));
        Ok(user)
    }

    fn create_user(&self, email: &str, password: &str) -> Result<Credential> {
        let user = self.issue_credential(email, password)?;
        Ok(Credential {
            uid: user.uid,
            id_token: format!("memory-token-{}", email),
        })
    }

    fn delete_credential(&self, credential: &Credential) -> Result<()> {
        let mut credentials = self
            .credentials
            .lock()
            .map_err(|_| Error::auth("credential registry poisoned"))?;
        credentials.retain(|_, c| c.uid != credential.uid);
        Ok(())
    }

    fn sign_out(&self) -> Result<()> {
        self.set_current(None);
        Ok(())
    }

    fn current_user(&self) -> Option<AuthUser> {
        self.current.lock().ok().and_then(|c| c.clone())
    }

    fn reauthenticate(&self, email: &str, password: &str) -> Result<()> {
        let current = self
            .current_user()
            .ok_or_else(|| Error::auth("not signed in"))?;
        let user = self.verify_credential(email, password)?;
        if user.uid != current.uid {
            return Err(Error::auth("credentials do not match the current user"));
        }
        Ok(())
    }

    fn update_password(&self, new_password: &str) -> Result<()> {
        let current = self
            .current_user()
            .ok_or_else(|| Error::auth("not signed in"))?;
        let email = current
            .email
            .ok_or_else(|| Error::auth("current user has no email"))?;
        let mut credentials = self
            .credentials
            .lock()
            .map_err(|_| Error::auth("credential registry poisoned"))?;
        match credentials.get_mut(&email) {
            Some(credential) => {
                credential.password = new_password.to_string();
                Ok(())
            }
            None => Err(Error::auth("credential no longer exists")),
        }
    }

    fn on_state_change(&self, listener: AuthStateListener) -> SubscriptionGuard {
        listener(self.current_user());
        self.notifier.subscribe(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_assigns_id_and_get_roundtrips() {
        let backend = MemoryBackend::new();
        let id = backend
            .add("installations", json!({"title": "Fiber install"}))
            .unwrap();
        assert_eq!(id.len(), DOCUMENT_ID_LEN);

        let doc = backend.get("installations", &id).unwrap().unwrap();
        assert_eq!(doc.fields["title"], "Fiber install");
    }

    #[test]
    fn test_update_missing_document_is_not_found() {
        let backend = MemoryBackend::new();
        let err = backend
            .update("installations", "nope", json!({"title": "x"}))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_update_merges_fields() {
        let backend = MemoryBackend::new();
        let id = backend
            .add("installations", json!({"title": "a", "status": "pending"}))
            .unwrap();
        backend
            .update("installations", &id, json!({"status": "completed"}))
            .unwrap();

        let doc = backend.get("installations", &id).unwrap().unwrap();
        assert_eq!(doc.fields["title"], "a");
        assert_eq!(doc.fields["status"], "completed");
    }

    #[test]
    fn test_timestamp_range_query() {
        let backend = MemoryBackend::new();
        backend.add("installations", json!({"date": 100})).unwrap();
        backend.add("installations", json!({"date": 250})).unwrap();
        backend.add("installations", json!({"date": 400})).unwrap();

        let hits = backend
            .query(
                "installations",
                &Filter::TimestampBetween {
                    field: "date".to_string(),
                    start_ms: 100,
                    end_ms: 250,
                },
            )
            .unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_eq_query() {
        let backend = MemoryBackend::new();
        backend
            .set("users", "u1", json!({"email": "a@x.com"}))
            .unwrap();

        let hits = backend
            .query(
                "users",
                &Filter::Eq {
                    field: "email".to_string(),
                    value: json!("a@x.com"),
                },
            )
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "u1");
    }

    #[test]
    fn test_sign_up_then_sign_in() {
        let backend = MemoryBackend::new();
        let user = backend.sign_up("a@x.com", "secret1").unwrap();
        backend.sign_out().unwrap();
        assert!(backend.current_user().is_none());

        let err = backend.sign_in("a@x.com", "wrong").unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
        assert!(backend.current_user().is_none());

        let again = backend.sign_in("a@x.com", "secret1").unwrap();
        assert_eq!(again.uid, user.uid);
    }

    #[test]
    fn test_create_user_does_not_switch_session() {
        let backend = MemoryBackend::new();
        backend.sign_up("admin@x.com", "secret1").unwrap();
        let before = backend.current_user().unwrap();

        backend.create_user("new@x.com", "secret2").unwrap();
        assert_eq!(backend.current_user().unwrap().uid, before.uid);
    }

    #[test]
    fn test_delete_credential_compensation() {
        let backend = MemoryBackend::new();
        let credential = backend.create_user("gone@x.com", "secret1").unwrap();
        backend.delete_credential(&credential).unwrap();
        assert!(backend.sign_in("gone@x.com", "secret1").is_err());
    }
}
