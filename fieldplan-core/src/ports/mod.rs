//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces to the hosted backend. The core domain and
//! services depend only on these traits, not on concrete implementations.

mod auth_provider;
mod document_store;

pub use auth_provider::{
    AuthProvider, AuthStateListener, AuthStateNotifier, Credential, SubscriptionGuard,
};
pub use document_store::{Document, DocumentStore, Filter};
