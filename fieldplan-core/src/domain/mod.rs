//! Core domain entities
//!
//! Pure data structures with validation logic - no I/O or external
//! dependencies.

mod installation;
mod session;
mod user;
pub mod result;

pub use installation::{Installation, InstallationStatus, InstallationUpdate, NewInstallation};
pub use session::{AuthUser, SessionState, SessionUser};
pub use user::{User, UserUpdate};
