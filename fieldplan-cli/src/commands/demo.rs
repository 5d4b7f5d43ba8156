//! Demo command - manage demo mode

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use fieldplan_core::adapters::demo::{DEMO_ADMIN_EMAIL, DEMO_TECH_EMAIL};
use fieldplan_core::config::Config;

use super::get_app_dir;

#[derive(Subcommand)]
pub enum DemoCommands {
    /// Enable demo mode
    #[command(name = "on")]
    On,
    /// Disable demo mode
    #[command(name = "off")]
    Off,
    /// Show demo mode status
    Status,
}

pub fn run(command: Option<DemoCommands>) -> Result<()> {
    let app_dir = get_app_dir();
    std::fs::create_dir_all(&app_dir)?;
    let mut config = Config::load(&app_dir)?;

    match command {
        Some(DemoCommands::On) => {
            config.enable_demo_mode();
            config.save(&app_dir)?;
            println!("{}", "Demo mode enabled".green());
            println!(
                "Sample data is generated on every run; you are signed in as {}.",
                DEMO_ADMIN_EMAIL
            );
            println!(
                "A regular account ({}) is also available. Run 'fp calendar' to start.",
                DEMO_TECH_EMAIL
            );
            Ok(())
        }
        Some(DemoCommands::Off) => {
            config.disable_demo_mode();
            config.save(&app_dir)?;
            println!("{}", "Demo mode disabled".yellow());
            Ok(())
        }
        Some(DemoCommands::Status) | None => {
            if config.demo_mode {
                println!("Demo mode is {}", "ON".green());
            } else {
                println!("Demo mode is {}", "OFF".yellow());
            }
            Ok(())
        }
    }
}
