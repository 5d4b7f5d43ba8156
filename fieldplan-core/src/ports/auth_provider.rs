//! Auth provider port - hosted credential and session abstraction
//!
//! Email/password credential issuance, session state, re-authentication and
//! password changes are delegated entirely to the hosted auth provider. The
//! port also carries the provider's identity-change notifications: listeners
//! fire once at subscription with the current identity (or None) and again on
//! every sign-in/sign-out.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use crate::domain::result::Result;
use crate::domain::AuthUser;

/// Callback invoked on every auth-state change
pub type AuthStateListener = Box<dyn Fn(Option<AuthUser>) + Send + Sync>;

/// A freshly issued credential, as returned by `create_user`
///
/// The token is kept so a failed follow-up profile write can compensate by
/// deleting the credential it belongs to.
#[derive(Debug, Clone)]
pub struct Credential {
    pub uid: String,
    pub id_token: String,
}

/// Hosted auth provider abstraction
pub trait AuthProvider: Send + Sync {
    /// Authenticate and make this identity the current session
    ///
    /// Fails with `AuthError` on invalid credentials. On success the
    /// state-change listeners fire with the new identity.
    fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser>;

    /// Create a credential and make it the current session (self signup)
    fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser>;

    /// Create a credential without touching the current session
    /// (admin-initiated account creation)
    fn create_user(&self, email: &str, password: &str) -> Result<Credential>;

    /// Delete a just-created credential (compensation for a failed profile
    /// write); only valid for credentials returned by `create_user`
    fn delete_credential(&self, credential: &Credential) -> Result<()>;

    /// Revoke the current session; listeners fire with None
    fn sign_out(&self) -> Result<()>;

    /// The current identity, if any
    fn current_user(&self) -> Option<AuthUser>;

    /// Re-authenticate the current user with a freshly supplied password
    ///
    /// Fails with `AuthError` when the password is wrong or the email does
    /// not match the current session.
    fn reauthenticate(&self, email: &str, password: &str) -> Result<()>;

    /// Change the current user's password; requires a recent authentication
    fn update_password(&self, new_password: &str) -> Result<()>;

    /// Subscribe to identity-change notifications
    ///
    /// The listener is invoked immediately with the current identity. The
    /// returned guard unsubscribes on drop.
    fn on_state_change(&self, listener: AuthStateListener) -> SubscriptionGuard;
}

/// Listener registry shared by auth provider adapters
///
/// Adapters call `notify` after every operation that changes the current
/// identity.
#[derive(Default)]
pub struct AuthStateNotifier {
    listeners: Arc<Mutex<HashMap<u64, AuthStateListener>>>,
    next_id: AtomicU64,
}

impl AuthStateNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener and return its unsubscribe guard
    pub fn subscribe(&self, listener: AuthStateListener) -> SubscriptionGuard {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.insert(id, listener);
        }
        SubscriptionGuard {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Invoke every registered listener with the given identity
    pub fn notify(&self, user: Option<&AuthUser>) {
        if let Ok(listeners) = self.listeners.lock() {
            for listener in listeners.values() {
                listener(user.cloned());
            }
        }
    }
}

/// Scoped auth-state subscription; dropping it unsubscribes
pub struct SubscriptionGuard {
    id: u64,
    listeners: Weak<Mutex<HashMap<u64, AuthStateListener>>>,
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            if let Ok(mut listeners) = listeners.lock() {
                listeners.remove(&self.id);
            }
        }
    }
}
