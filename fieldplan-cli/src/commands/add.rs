//! Add command - schedule a new installation

use anyhow::Result;
use dialoguer::Input;

use fieldplan_core::services::InstallationForm;

use super::{get_context, parse_instant, require_user, spinner};
use crate::output;

/// Prompt for any field not supplied as a flag
fn prompt_missing(value: Option<String>, label: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Input::new().with_prompt(label).interact_text()?),
    }
}

pub fn run(
    title: Option<String>,
    description: Option<String>,
    date: Option<String>,
    address: Option<String>,
    client: Option<String>,
    phone: Option<String>,
) -> Result<()> {
    let context = get_context()?;
    let user = require_user(&context)?;

    let date = parse_instant(&prompt_missing(date, "Date (YYYY-MM-DD HH:MM)")?)?;
    let form = InstallationForm {
        title: prompt_missing(title, "Title")?,
        description: prompt_missing(description, "Description")?,
        date,
        address: prompt_missing(address, "Address")?,
        client: prompt_missing(client, "Client")?,
        phone: prompt_missing(phone, "Phone")?,
    };

    let new = form.into_new(&user.uid)?;

    let _busy = context.session.begin_busy();
    let pb = spinner("Scheduling installation...");
    let result = context.installation_service.add(&new);
    pb.finish_and_clear();

    let id = result?;
    output::success(&format!("Installation scheduled: {}", id));
    println!(
        "  {} at {}",
        new.title,
        output::format_local(new.date)
    );
    Ok(())
}
