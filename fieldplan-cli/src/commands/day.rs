//! Day command - installations scheduled on one calendar day

use anyhow::Result;
use chrono::Local;

use super::{get_context, parse_day};
use crate::output;

pub fn run(date: Option<String>, json: bool) -> Result<()> {
    let context = get_context()?;
    let day = match date {
        Some(d) => parse_day(&d)?,
        None => Local::now().date_naive(),
    };

    let installations = context.installation_service.get_by_date(day)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&installations)?);
        return Ok(());
    }

    if installations.is_empty() {
        output::info(&format!(
            "No installations on {}.",
            day.format("%Y-%m-%d")
        ));
        return Ok(());
    }

    let theme = context.theme();
    let mut table = output::create_table();
    table.set_header(vec!["Time", "Title", "Client", "Address", "Status", "ID"]);

    for installation in &installations {
        table.add_row(vec![
            installation
                .date
                .with_timezone(&Local)
                .format("%H:%M")
                .to_string(),
            installation.title.clone(),
            installation.client.clone(),
            installation.address.clone(),
            output::status_label(installation.status, &theme).to_string(),
            installation.id.clone(),
        ]);
    }

    println!("{}", table);
    Ok(())
}
