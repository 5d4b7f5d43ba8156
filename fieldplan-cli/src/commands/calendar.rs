//! Calendar command - schedule overview with per-day markers

use anyhow::Result;
use chrono::Local;
use colored::Colorize;
use serde_json::json;

use super::{get_context, parse_day};
use crate::output;

pub fn run(date: Option<String>, json: bool) -> Result<()> {
    let context = get_context()?;
    let selected = match date {
        Some(d) => parse_day(&d)?,
        None => Local::now().date_naive(),
    };

    let theme = context.theme();
    let markers = context.calendar_service.markers(Some(selected), &theme)?;

    if json {
        let mut days = serde_json::Map::new();
        for (day, marker) in &markers {
            let dots: Vec<_> = marker
                .dots
                .iter()
                .map(|dot| json!({"key": dot.key, "color": dot.color}))
                .collect();
            days.insert(
                day.format("%Y-%m-%d").to_string(),
                json!({
                    "marked": marker.marked,
                    "selected": marker.selected,
                    "selectedColor": marker.selected_color,
                    "dots": dots,
                }),
            );
        }
        println!("{}", serde_json::to_string_pretty(&serde_json::Value::Object(days))?);
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Date", "Installations", ""]);

    for (day, marker) in &markers {
        let dots = marker
            .dots
            .iter()
            .map(|dot| output::themed("●", dot.color).to_string())
            .collect::<Vec<_>>()
            .join(" ");
        let highlight = if marker.selected {
            output::themed("◀ selected", theme.primary).to_string()
        } else {
            String::new()
        };
        table.add_row(vec![day.format("%Y-%m-%d").to_string(), dots, highlight]);
    }

    println!("{}", table);
    println!(
        "{} pending  {} completed  {} cancelled",
        output::themed("●", theme.warning),
        output::themed("●", theme.success),
        output::themed("●", theme.error),
    );
    println!();
    println!(
        "{}",
        format!("Run `fp day {}` to see that day's schedule.", selected.format("%Y-%m-%d")).dimmed()
    );

    Ok(())
}
