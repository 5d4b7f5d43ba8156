//! Profile commands - account details, password, theme and support contact

use anyhow::{anyhow, Result};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Password;
use url::Url;

use fieldplan_core::config::Config;
use fieldplan_core::services::PasswordChangeForm;
use fieldplan_core::{Theme, ThemeMode};

use super::{get_app_dir, get_context, require_user, spinner};
use crate::output;

pub fn run_profile(json: bool) -> Result<()> {
    let context = get_context()?;
    let user = require_user(&context)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
        return Ok(());
    }

    println!("{}", user.name.as_deref().unwrap_or("(no name)").bold());
    println!("  Email: {}", user.email.as_deref().unwrap_or("-"));
    println!(
        "  Role:  {}",
        if user.is_admin { "administrator" } else { "technician" }
    );
    println!("  ID:    {}", user.uid.dimmed());
    Ok(())
}

pub fn run_passwd() -> Result<()> {
    let context = get_context()?;
    let user = require_user(&context)?;
    let email = user
        .email
        .ok_or_else(|| anyhow!("current account has no email; cannot change the password"))?;

    let current = Password::new().with_prompt("Current password").interact()?;
    let new = Password::new().with_prompt("New password").interact()?;
    let confirmation = Password::new().with_prompt("Confirm new password").interact()?;

    let form = PasswordChangeForm {
        current,
        new,
        confirmation,
    };
    form.validate()?;

    let _busy = context.session.begin_busy();
    let pb = spinner("Changing password...");
    let result = context
        .auth_service
        .update_password(&email, &form.current, &form.new);
    pb.finish_and_clear();
    result?;

    output::success("Password changed");
    Ok(())
}

#[derive(Subcommand)]
pub enum ThemeCommands {
    /// Show the current theme
    Show,
    /// Switch to the light theme
    Light,
    /// Switch to the dark theme
    Dark,
    /// Toggle between light and dark
    Toggle,
}

pub fn run_theme(command: Option<ThemeCommands>) -> Result<()> {
    let app_dir = get_app_dir();
    std::fs::create_dir_all(&app_dir)?;
    let mut config = Config::load(&app_dir)?;

    let next = match command {
        Some(ThemeCommands::Light) => Some(ThemeMode::Light),
        Some(ThemeCommands::Dark) => Some(ThemeMode::Dark),
        Some(ThemeCommands::Toggle) => Some(config.theme.toggled()),
        Some(ThemeCommands::Show) | None => None,
    };

    if let Some(mode) = next {
        config.set_theme(mode);
        config.save(&app_dir)?;
        output::success(&format!("Theme set to {}", mode.as_str()));
    } else {
        println!("Theme: {}", config.theme.as_str());
    }

    let theme = Theme::for_mode(config.theme);
    println!(
        "  {} primary  {} success  {} warning  {} error",
        output::themed("■", theme.primary),
        output::themed("■", theme.success),
        output::themed("■", theme.warning),
        output::themed("■", theme.error),
    );
    Ok(())
}

/// Build the WhatsApp support link for the configured number
fn support_link(phone: &str, name: &str) -> Result<Url> {
    let mut url = Url::parse(&format!("https://wa.me/{}", phone))?;
    url.query_pairs_mut().append_pair(
        "text",
        &format!("Olá, sou {}, preciso de ajuda com o Fieldplan.", name),
    );
    Ok(url)
}

pub fn run_support() -> Result<()> {
    let app_dir = get_app_dir();
    let config = Config::load(&app_dir)?;
    let phone = config.support_phone.ok_or_else(|| {
        anyhow!("no support phone configured; set app.supportPhone in settings.json")
    })?;

    // Personalize when a session exists; support still works signed out
    let name = get_context()
        .ok()
        .and_then(|c| c.session.current_user())
        .and_then(|u| u.name.or(u.email))
        .unwrap_or_else(|| "um técnico".to_string());

    let url = support_link(&phone, &name)?;
    println!("Contact support on WhatsApp:");
    println!("  {}", url);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_support_link_encodes_message() {
        let url = support_link("5511999990000", "Ana").unwrap();
        assert_eq!(url.host_str(), Some("wa.me"));
        assert_eq!(url.path(), "/5511999990000");
        let text = url
            .query_pairs()
            .find(|(k, _)| k == "text")
            .map(|(_, v)| v.to_string())
            .unwrap();
        assert!(text.contains("Ana"));
    }
}
