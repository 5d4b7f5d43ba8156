//! Service layer
//!
//! Services orchestrate the ports into the application's operations:
//! scheduling, user administration, authentication, the session context,
//! calendar marker aggregation, input validation and diagnostic logging.

pub mod auth;
pub mod calendar;
pub mod forms;
pub mod installation;
pub mod logging;
pub mod session;
pub mod user;
mod wire;

pub use auth::AuthService;
pub use calendar::{
    aggregate_markers, apply_selection, CalendarService, DayMarker, MarkerDot, MarkerPalette,
};
pub use forms::{
    EditUserForm, InstallationForm, LoginForm, NewUserForm, PasswordChangeForm, SignupForm,
};
pub use installation::InstallationService;
pub use logging::{LogEntry, LogEvent, LoggingService};
pub use session::{BusyScope, SessionContext};
pub use user::UserService;
