//! Integration tests exercising the services together against the in-memory
//! backend, plus the demo-mode context end to end.

use std::sync::Arc;

use chrono::{Duration, Local, NaiveTime, TimeZone, Utc};
use tempfile::tempdir;

use fieldplan_core::adapters::memory::MemoryBackend;
use fieldplan_core::services::{
    AuthService, InstallationForm, InstallationService, SessionContext, UserService,
};
use fieldplan_core::{
    Error, FieldplanContext, InstallationStatus, InstallationUpdate, SessionState, Theme,
    UserUpdate,
};

fn backend() -> Arc<MemoryBackend> {
    Arc::new(MemoryBackend::new())
}

fn demo_context() -> (tempfile::TempDir, FieldplanContext) {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("settings.json"),
        r#"{"app": {"demoMode": true}}"#,
    )
    .unwrap();
    let context = FieldplanContext::new(dir.path()).unwrap();
    (dir, context)
}

#[test]
fn test_signup_signout_signin_session_lifecycle() {
    let backend = backend();
    let auth = AuthService::new(backend.clone(), backend.clone());
    let session = SessionContext::new();
    session.attach(backend.as_ref(), backend.clone());
    assert_eq!(session.state(), SessionState::Unauthenticated);

    auth.sign_up("Ana Souza", "ana@example.com", "secret1")
        .unwrap();
    let user = session.current_user().unwrap();
    assert_eq!(user.name.as_deref(), Some("Ana Souza"));
    assert!(!user.is_admin);

    auth.sign_out().unwrap();
    assert_eq!(session.state(), SessionState::Unauthenticated);

    let err = auth.sign_in("ana@example.com", "wrong").unwrap_err();
    assert!(matches!(err, Error::Auth(_)));
    assert_eq!(session.state(), SessionState::Unauthenticated);

    auth.sign_in("ana@example.com", "secret1").unwrap();
    assert!(session.current_user().is_some());
}

#[test]
fn test_admin_creates_and_manages_users() {
    let backend = backend();
    let users = UserService::new(backend.clone(), backend.clone());

    let uid = users
        .create("New Tech", "tech@example.com", "secret1", false)
        .unwrap();
    assert!(users.email_exists("tech@example.com").unwrap());

    users
        .update(
            &uid,
            &UserUpdate {
                name: Some("Senior Tech".to_string()),
                is_admin: Some(true),
            },
        )
        .unwrap();
    let user = users.get_by_id(&uid).unwrap();
    assert_eq!(user.name, "Senior Tech");
    assert!(user.is_admin);

    users.remove(&uid).unwrap();
    assert!(matches!(
        users.get_by_id(&uid).unwrap_err(),
        Error::NotFound(_)
    ));
}

#[test]
fn test_schedule_and_query_by_day() {
    let backend = backend();
    let installations = InstallationService::new(backend.clone());

    let day = Local::now().date_naive() + Duration::days(7);
    let instant = day
        .and_time(NaiveTime::from_hms_opt(10, 30, 0).unwrap())
        .and_local_timezone(Local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN)));

    let form = InstallationForm {
        title: "Fiber install".to_string(),
        description: "New drop from the street pole".to_string(),
        date: instant,
        address: "Rua das Flores 10".to_string(),
        client: "Mercado Bom Preço".to_string(),
        phone: "+55 11 98888-0001".to_string(),
    };
    let id = installations.add(&form.into_new("uid-admin").unwrap()).unwrap();

    let on_day = installations.get_by_date(day).unwrap();
    assert_eq!(on_day.len(), 1);
    assert_eq!(on_day[0].id, id);
    assert_eq!(on_day[0].date, instant);

    assert!(installations
        .get_by_date(day + Duration::days(1))
        .unwrap()
        .is_empty());

    installations
        .update(&id, &InstallationUpdate::status(InstallationStatus::Completed))
        .unwrap();
    assert_eq!(
        installations.get_by_id(&id).unwrap().status,
        InstallationStatus::Completed
    );
}

#[test]
fn test_demo_context_has_markers_and_day_view() {
    let (_dir, context) = demo_context();

    let today = Local::now().date_naive();
    let markers = context
        .calendar_service
        .markers(Some(today), &context.theme())
        .unwrap();

    let today_marker = &markers[&today];
    assert!(today_marker.selected);
    assert!(!today_marker.dots.is_empty());
    assert_eq!(today_marker.selected_color, Some(Theme::light().primary));

    let today_installations = context.installation_service.get_by_date(today).unwrap();
    assert_eq!(today_installations.len(), today_marker.dots.len());
}

#[test]
fn test_demo_context_supports_full_user_admin_flow() {
    let (_dir, context) = demo_context();
    assert!(context.session.is_admin());

    let before = context.user_service.get_all().unwrap().len();
    let uid = context
        .user_service
        .create("Extra Tech", "extra@fieldplan.demo", "secret1", false)
        .unwrap();
    assert_eq!(context.user_service.get_all().unwrap().len(), before + 1);

    // Creating an account must not replace the admin session
    assert!(context.session.is_admin());

    context.user_service.remove(&uid).unwrap();
    assert_eq!(context.user_service.get_all().unwrap().len(), before);
}
