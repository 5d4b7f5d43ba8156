//! Output formatting utilities

use chrono::{DateTime, Local, Utc};
use colored::{ColoredString, Colorize};
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use fieldplan_core::{InstallationStatus, Theme};

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Format an instant in the local timezone
pub fn format_local(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// Parse a `#rrggbb` hex color into RGB components
fn hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Colorize text with a theme hex color, falling back to plain text
pub fn themed(text: &str, hex: &str) -> ColoredString {
    match hex_rgb(hex) {
        Some((r, g, b)) => text.truecolor(r, g, b),
        None => text.normal(),
    }
}

/// A status label colored by the theme palette
pub fn status_label(status: InstallationStatus, theme: &Theme) -> ColoredString {
    let color = match status {
        InstallationStatus::Pending => theme.warning,
        InstallationStatus::Completed => theme.success,
        InstallationStatus::Cancelled => theme.error,
    };
    themed(status.as_str(), color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_rgb() {
        assert_eq!(hex_rgb("#FF9800"), Some((0xFF, 0x98, 0x00)));
        assert_eq!(hex_rgb("#6200ee"), Some((0x62, 0x00, 0xee)));
        assert_eq!(hex_rgb("nope"), None);
        assert_eq!(hex_rgb("#fff"), None);
    }
}
