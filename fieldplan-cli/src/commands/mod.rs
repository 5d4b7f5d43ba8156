//! CLI command implementations

pub mod add;
pub mod auth;
pub mod calendar;
pub mod day;
pub mod demo;
pub mod edit;
pub mod logs;
pub mod profile;
pub mod remove;
pub mod show;
pub mod users;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use indicatif::{ProgressBar, ProgressStyle};

use fieldplan_core::services::{LogEvent, LoggingService};
use fieldplan_core::{FieldplanContext, Installation, SessionUser};

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let app_dir = get_app_dir();
    std::fs::create_dir_all(&app_dir).ok()?;
    LoggingService::new(&app_dir, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the fieldplan directory from environment or default
pub fn get_app_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("FIELDPLAN_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .expect("Could not find home directory")
            .join(".fieldplan")
    }
}

/// Get or create the fieldplan context
pub fn get_context() -> Result<FieldplanContext> {
    let app_dir = get_app_dir();

    std::fs::create_dir_all(&app_dir)
        .with_context(|| format!("Failed to create fieldplan directory: {:?}", app_dir))?;

    FieldplanContext::new(&app_dir).context("Failed to initialize fieldplan context")
}

/// The signed-in user, or a sign-in hint
pub fn require_user(context: &FieldplanContext) -> Result<SessionUser> {
    match context.session.current_user() {
        Some(user) => Ok(user),
        None => bail!("not signed in; run `fp login` first"),
    }
}

/// The signed-in user if they are an administrator
pub fn require_admin(context: &FieldplanContext) -> Result<SessionUser> {
    let user = require_user(context)?;
    if !user.is_admin {
        bail!("this command requires an administrator account");
    }
    Ok(user)
}

/// Installations are changed or removed by their creator or an administrator
pub fn require_creator_or_admin(installation: &Installation, user: &SessionUser) -> Result<()> {
    if user.is_admin || installation.created_by == user.uid {
        return Ok(());
    }
    bail!(
        "installation {} belongs to another user; only its creator or an administrator can change it",
        installation.id
    );
}

/// Spinner shown while a backend call is in flight
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Parse a calendar day in `YYYY-MM-DD` form
pub fn parse_day(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date '{}'; expected YYYY-MM-DD", input))
}

/// Parse a local instant in `YYYY-MM-DD HH:MM` form
pub fn parse_instant(input: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(input.trim(), "%Y-%m-%d %H:%M")
        .with_context(|| format!("invalid date '{}'; expected YYYY-MM-DD HH:MM", input))?;
    Ok(naive
        .and_local_timezone(Local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_day() {
        assert!(parse_day("2026-02-30").is_err());
        assert_eq!(
            parse_day(" 2026-05-01 ").unwrap(),
            NaiveDate::from_ymd_opt(2026, 5, 1).unwrap()
        );
    }

    #[test]
    fn test_parse_instant_rejects_missing_time() {
        assert!(parse_instant("2026-05-01").is_err());
        assert!(parse_instant("2026-05-01 14:30").is_ok());
    }

    #[test]
    fn test_creator_or_admin_gate() {
        use fieldplan_core::InstallationStatus;

        let installation = Installation {
            id: "inst-1".to_string(),
            title: "Fiber install".to_string(),
            description: String::new(),
            date: Utc::now(),
            address: String::new(),
            client: String::new(),
            phone: String::new(),
            status: InstallationStatus::Pending,
            created_by: "uid-creator".to_string(),
            created_at: Utc::now(),
        };
        let user = |uid: &str, is_admin: bool| SessionUser {
            uid: uid.to_string(),
            email: None,
            name: None,
            is_admin,
        };

        assert!(require_creator_or_admin(&installation, &user("uid-creator", false)).is_ok());
        assert!(require_creator_or_admin(&installation, &user("uid-other", true)).is_ok());
        assert!(require_creator_or_admin(&installation, &user("uid-other", false)).is_err());
    }
}
