//! Fieldplan Core - Business logic for field installation scheduling
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (Installation, User, session types)
//! - **ports**: Trait definitions for external dependencies (DocumentStore, AuthProvider)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (hosted REST backend, in-memory demo backend)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod ports;
pub mod services;
pub mod theme;

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::Utc;
use serde_json::json;

use adapters::demo::{demo_accounts, generate_demo_installations, DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD};
use adapters::memory::MemoryBackend;
use adapters::rest::RestBackend;
use config::Config;
use ports::{AuthProvider, DocumentStore};
use services::{
    AuthService, CalendarService, InstallationService, SessionContext, UserService,
};

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{
    AuthUser, Installation, InstallationStatus, InstallationUpdate, NewInstallation, SessionState,
    SessionUser, User, UserUpdate,
};
pub use theme::{Theme, ThemeMode};

/// Main context for Fieldplan operations
///
/// This is the primary entry point for all business logic. It holds the
/// configuration, the backend, the session context and all services.
pub struct FieldplanContext {
    pub config: Config,
    pub auth: Arc<dyn AuthProvider>,
    pub store: Arc<dyn DocumentStore>,
    pub session: SessionContext,
    pub auth_service: AuthService,
    pub installation_service: InstallationService,
    pub user_service: UserService,
    pub calendar_service: CalendarService,
}

impl FieldplanContext {
    /// Create a new Fieldplan context
    ///
    /// In demo mode the backend is an in-memory store seeded with sample
    /// accounts and installations, signed in as the demo administrator.
    /// Otherwise the hosted backend from `settings.json` is used, restoring
    /// any persisted session.
    pub fn new(app_dir: &Path) -> Result<Self> {
        let config = Config::load(app_dir)?;

        let (auth, store): (Arc<dyn AuthProvider>, Arc<dyn DocumentStore>) = if config.demo_mode {
            let backend = seeded_demo_backend()?;
            (backend.clone(), backend)
        } else {
            let settings = config.backend.as_ref().ok_or_else(|| {
                anyhow!(
                    "no backend configured; add a \"backend\" section to settings.json \
                     or enable demo mode with `fp demo on`"
                )
            })?;
            let backend = Arc::new(RestBackend::new(settings, app_dir)?);
            (backend.clone(), backend)
        };

        let installation_service = InstallationService::new(Arc::clone(&store));
        let user_service = UserService::new(Arc::clone(&auth), Arc::clone(&store));
        let auth_service = AuthService::new(Arc::clone(&auth), Arc::clone(&store));
        let calendar_service = CalendarService::new(installation_service.clone());

        let session = SessionContext::new();
        session.attach(auth.as_ref(), Arc::clone(&store));

        if config.demo_mode && session.current_user().is_none() {
            auth.sign_in(DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD)?;
        }

        Ok(Self {
            config,
            auth,
            store,
            session,
            auth_service,
            installation_service,
            user_service,
            calendar_service,
        })
    }

    /// The active color palette, derived from the persisted preference
    pub fn theme(&self) -> Theme {
        Theme::for_mode(self.config.theme)
    }
}

/// Build the in-memory backend with demo accounts and a sample schedule
fn seeded_demo_backend() -> Result<Arc<MemoryBackend>> {
    let backend = Arc::new(MemoryBackend::new());

    for (uid, name, email, password, is_admin) in demo_accounts() {
        backend.register_credential(email, password, uid);
        backend.set(
            "users",
            uid,
            json!({
                "name": name,
                "email": email,
                "isAdmin": is_admin,
                "createdAt": Utc::now().timestamp_millis(),
            }),
        )?;
    }

    let installations = InstallationService::new(backend.clone() as Arc<dyn DocumentStore>);
    for installation in generate_demo_installations() {
        installations.add(&installation)?;
    }

    Ok(backend)
}
