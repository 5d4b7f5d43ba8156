//! Session context - auth state merged with the profile record
//!
//! Subscribes to the auth provider's identity notifications and keeps a
//! process-wide session state. On every sign-in the profile document is
//! fetched and merged; when the profile is missing or unreadable the session
//! falls back to the bare identity with `is_admin` false. The subscription is
//! scoped: dropping the context (or calling `detach`) unsubscribes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::{AuthUser, SessionState, SessionUser};
use crate::ports::{AuthProvider, DocumentStore, SubscriptionGuard};

use super::wire::read_string;

const USERS_COLLECTION: &str = "users";

pub struct SessionContext {
    state: Arc<Mutex<SessionState>>,
    busy: Arc<AtomicBool>,
    guard: Mutex<Option<SubscriptionGuard>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::Uninitialized)),
            busy: Arc::new(AtomicBool::new(false)),
            guard: Mutex::new(None),
        }
    }

    /// Subscribe to auth-state changes and start tracking the session
    ///
    /// The provider delivers the current identity immediately, so the state
    /// leaves `Loading` before this returns on a synchronous provider.
    pub fn attach(&self, auth: &dyn AuthProvider, store: Arc<dyn DocumentStore>) {
        if let Ok(mut state) = self.state.lock() {
            *state = SessionState::Loading;
        }

        let state = Arc::clone(&self.state);
        let guard = auth.on_state_change(Box::new(move |identity| {
            let next = match identity {
                Some(auth_user) => SessionState::Authenticated(merge_profile(&store, &auth_user)),
                None => SessionState::Unauthenticated,
            };
            if let Ok(mut state) = state.lock() {
                *state = next;
            }
        }));

        if let Ok(mut slot) = self.guard.lock() {
            *slot = Some(guard);
        }
    }

    /// Drop the subscription; the state stops tracking further changes
    pub fn detach(&self) {
        if let Ok(mut slot) = self.guard.lock() {
            *slot = None;
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
            .lock()
            .map(|s| s.clone())
            .unwrap_or(SessionState::Uninitialized)
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.state().user().cloned()
    }

    pub fn is_admin(&self) -> bool {
        self.current_user().map(|u| u.is_admin).unwrap_or(false)
    }

    /// Mark the session busy for the lifetime of the returned scope
    ///
    /// Used by long-running commands so concurrent entry points can refuse to
    /// start a second operation.
    pub fn begin_busy(&self) -> BusyScope {
        self.busy.store(true, Ordering::SeqCst);
        BusyScope {
            busy: Arc::clone(&self.busy),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII busy flag; cleared on drop, including on early returns
pub struct BusyScope {
    busy: Arc<AtomicBool>,
}

impl Drop for BusyScope {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::SeqCst);
    }
}

fn merge_profile(store: &Arc<dyn DocumentStore>, auth_user: &AuthUser) -> SessionUser {
    match store.get(USERS_COLLECTION, &auth_user.uid) {
        Ok(Some(document)) => {
            let fields = &document.fields;
            let name = read_string(fields, "name");
            SessionUser {
                uid: auth_user.uid.clone(),
                email: auth_user.email.clone(),
                name: (!name.is_empty()).then_some(name),
                is_admin: fields
                    .get("isAdmin")
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false),
            }
        }
        // Missing or unreadable profile never blocks the session
        _ => SessionUser::without_profile(auth_user),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryBackend;
    use serde_json::json;

    fn backend() -> Arc<MemoryBackend> {
        Arc::new(MemoryBackend::new())
    }

    #[test]
    fn test_attach_with_no_session_is_unauthenticated() {
        let backend = backend();
        let context = SessionContext::new();
        context.attach(backend.as_ref(), backend.clone());
        assert_eq!(context.state(), SessionState::Unauthenticated);
    }

    #[test]
    fn test_sign_in_merges_profile() {
        let backend = backend();
        backend.register_credential("ana@example.com", "secret1", "uid-ana");
        backend
            .set(
                "users",
                "uid-ana",
                json!({"name": "Ana Souza", "email": "ana@example.com", "isAdmin": true}),
            )
            .unwrap();

        let context = SessionContext::new();
        context.attach(backend.as_ref(), backend.clone());
        backend.sign_in("ana@example.com", "secret1").unwrap();

        let user = context.current_user().unwrap();
        assert_eq!(user.name.as_deref(), Some("Ana Souza"));
        assert!(user.is_admin);
        assert!(context.is_admin());
    }

    #[test]
    fn test_missing_profile_falls_back_to_bare_identity() {
        let backend = backend();
        backend.register_credential("ghost@example.com", "secret1", "uid-ghost");

        let context = SessionContext::new();
        context.attach(backend.as_ref(), backend.clone());
        backend.sign_in("ghost@example.com", "secret1").unwrap();

        let user = context.current_user().unwrap();
        assert_eq!(user.uid, "uid-ghost");
        assert!(user.name.is_none());
        assert!(!user.is_admin);
    }

    #[test]
    fn test_sign_out_transitions_to_unauthenticated() {
        let backend = backend();
        backend.register_credential("ana@example.com", "secret1", "uid-ana");

        let context = SessionContext::new();
        context.attach(backend.as_ref(), backend.clone());
        backend.sign_in("ana@example.com", "secret1").unwrap();
        assert!(context.current_user().is_some());

        backend.sign_out().unwrap();
        assert_eq!(context.state(), SessionState::Unauthenticated);
    }

    #[test]
    fn test_detach_stops_tracking() {
        let backend = backend();
        backend.register_credential("ana@example.com", "secret1", "uid-ana");

        let context = SessionContext::new();
        context.attach(backend.as_ref(), backend.clone());
        context.detach();

        backend.sign_in("ana@example.com", "secret1").unwrap();
        assert_eq!(context.state(), SessionState::Unauthenticated);
    }

    #[test]
    fn test_busy_scope_clears_on_drop() {
        let context = SessionContext::new();
        assert!(!context.is_busy());
        {
            let _scope = context.begin_busy();
            assert!(context.is_busy());
        }
        assert!(!context.is_busy());
    }
}
