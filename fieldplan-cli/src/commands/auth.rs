//! Auth commands - login, logout and self-service signup

use anyhow::Result;
use dialoguer::{Confirm, Input, Password};

use fieldplan_core::services::{LogEvent, LoginForm, SignupForm};

use super::{get_context, get_logger, log_event, require_user, spinner};
use crate::output;

pub fn run_login(email: Option<String>) -> Result<()> {
    let context = get_context()?;

    let email: String = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let password = Password::new().with_prompt("Password").interact()?;

    let form = LoginForm {
        email: email.clone(),
        password,
    };
    form.validate()?;

    let _busy = context.session.begin_busy();
    let pb = spinner("Signing in...");
    let result = context.auth_service.sign_in(&form.email, &form.password);
    pb.finish_and_clear();
    let user = result?;

    let logger = get_logger();
    log_event(&logger, LogEvent::new("signed_in").with_user(&user.uid));

    let display = context
        .session
        .current_user()
        .and_then(|u| u.name)
        .unwrap_or(email);
    output::success(&format!("Signed in as {}", display));
    Ok(())
}

pub fn run_logout(force: bool) -> Result<()> {
    let context = get_context()?;
    let user = require_user(&context)?;

    if !force {
        let confirmed = Confirm::new()
            .with_prompt("Sign out?")
            .default(true)
            .interact()?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    context.auth_service.sign_out()?;

    let logger = get_logger();
    log_event(&logger, LogEvent::new("signed_out").with_user(&user.uid));

    output::success("Signed out");
    Ok(())
}

pub fn run_signup() -> Result<()> {
    let context = get_context()?;

    let name: String = Input::new().with_prompt("Name").interact_text()?;
    let email: String = Input::new().with_prompt("Email").interact_text()?;
    let password = Password::new().with_prompt("Password").interact()?;
    let confirmation = Password::new().with_prompt("Confirm password").interact()?;

    let form = SignupForm {
        name,
        email,
        password,
        confirmation,
    };
    form.validate()?;

    let _busy = context.session.begin_busy();
    let pb = spinner("Creating account...");
    let result = context
        .auth_service
        .sign_up(&form.name, &form.email, &form.password);
    pb.finish_and_clear();
    let user = result?;

    let logger = get_logger();
    log_event(&logger, LogEvent::new("signed_up").with_user(&user.uid));

    output::success(&format!("Account created; signed in as {}", form.name));
    Ok(())
}
