//! Edit command - partial updates to an installation

use anyhow::Result;

use fieldplan_core::{InstallationStatus, InstallationUpdate};

use super::{get_context, parse_instant, require_creator_or_admin, require_user, spinner};
use crate::output;

pub fn run(
    id: &str,
    title: Option<String>,
    description: Option<String>,
    date: Option<String>,
    address: Option<String>,
    client: Option<String>,
    phone: Option<String>,
    status: Option<String>,
) -> Result<()> {
    let context = get_context()?;
    let user = require_user(&context)?;

    let installation = context.installation_service.get_by_id(id)?;
    require_creator_or_admin(&installation, &user)?;

    let update = InstallationUpdate {
        title,
        description,
        date: date.as_deref().map(parse_instant).transpose()?,
        address,
        client,
        phone,
        status: status
            .as_deref()
            .map(|s| s.parse::<InstallationStatus>())
            .transpose()?,
    };

    if update.is_empty() {
        output::warning("Nothing to update; pass at least one field flag.");
        return Ok(());
    }

    let _busy = context.session.begin_busy();
    let pb = spinner("Updating installation...");
    let result = context.installation_service.update(id, &update);
    pb.finish_and_clear();
    result?;

    output::success(&format!("Installation {} updated", id));
    Ok(())
}

/// Shorthand for updating only the status
pub fn run_status(id: &str, status: &str) -> Result<()> {
    let context = get_context()?;
    let user = require_user(&context)?;

    let installation = context.installation_service.get_by_id(id)?;
    require_creator_or_admin(&installation, &user)?;

    let status = status.parse::<InstallationStatus>()?;

    let _busy = context.session.begin_busy();
    let pb = spinner("Updating status...");
    let result = context
        .installation_service
        .update(id, &InstallationUpdate::status(status));
    pb.finish_and_clear();
    result?;

    let theme = context.theme();
    output::success(&format!(
        "Installation {} is now {}",
        id,
        output::status_label(status, &theme)
    ));
    Ok(())
}
