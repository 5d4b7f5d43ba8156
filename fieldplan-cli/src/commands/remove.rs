//! Remove command - delete an installation

use anyhow::Result;
use dialoguer::Confirm;

use super::{get_context, require_creator_or_admin, require_user, spinner};
use crate::output;

pub fn run(id: &str, force: bool) -> Result<()> {
    let context = get_context()?;
    let user = require_user(&context)?;

    // Show what is about to be deleted; also surfaces NotFound early
    let installation = context.installation_service.get_by_id(id)?;
    require_creator_or_admin(&installation, &user)?;

    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Remove '{}' on {}?",
                installation.title,
                output::format_local(installation.date)
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let _busy = context.session.begin_busy();
    let pb = spinner("Removing installation...");
    let result = context.installation_service.remove(id);
    pb.finish_and_clear();
    result?;

    output::success(&format!("Installation {} removed", id));
    Ok(())
}
