//! Show command - details of one installation

use anyhow::Result;
use colored::Colorize;

use super::get_context;
use crate::output;

pub fn run(id: &str, json: bool) -> Result<()> {
    let context = get_context()?;
    let installation = context.installation_service.get_by_id(id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&installation)?);
        return Ok(());
    }

    let theme = context.theme();
    println!("{}", installation.title.bold());
    println!("  Status:      {}", output::status_label(installation.status, &theme));
    println!("  Date:        {}", output::format_local(installation.date));
    println!("  Client:      {}", installation.client);
    println!("  Phone:       {}", installation.phone);
    println!("  Address:     {}", installation.address);
    println!("  Description: {}", installation.description);
    println!("  Created:     {}", output::format_local(installation.created_at));
    println!("  ID:          {}", installation.id.dimmed());
    Ok(())
}
