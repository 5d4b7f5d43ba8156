//! Fieldplan CLI - installation scheduling in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{add, auth, calendar, day, demo, edit, logs, profile, remove, show, users};
use fieldplan_core::services::LogEvent;

/// Fieldplan - field installation scheduling in your terminal
#[derive(Parser)]
#[command(name = "fp", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the installation calendar
    Calendar {
        /// Day to highlight (YYYY-MM-DD, defaults to today)
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List installations on one day
    Day {
        /// Day to list (YYYY-MM-DD, defaults to today)
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Schedule a new installation
    Add {
        /// Title
        #[arg(long)]
        title: Option<String>,
        /// Work description
        #[arg(long)]
        description: Option<String>,
        /// Scheduled date and time (YYYY-MM-DD HH:MM, local)
        #[arg(long)]
        date: Option<String>,
        /// Address
        #[arg(long)]
        address: Option<String>,
        /// Client name
        #[arg(long)]
        client: Option<String>,
        /// Contact phone
        #[arg(long)]
        phone: Option<String>,
    },

    /// Show one installation
    Show {
        /// Installation id
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update an installation's status
    Status {
        /// Installation id
        id: String,
        /// New status (pending, completed, cancelled)
        status: String,
    },

    /// Edit installation fields
    Edit {
        /// Installation id
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New date and time (YYYY-MM-DD HH:MM, local)
        #[arg(long)]
        date: Option<String>,
        /// New address
        #[arg(long)]
        address: Option<String>,
        /// New client name
        #[arg(long)]
        client: Option<String>,
        /// New contact phone
        #[arg(long)]
        phone: Option<String>,
        /// New status (pending, completed, cancelled)
        #[arg(long)]
        status: Option<String>,
    },

    /// Remove an installation
    Remove {
        /// Installation id
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Manage user accounts (administrators only)
    Users {
        #[command(subcommand)]
        command: users::UsersCommands,
    },

    /// Sign in
    Login {
        /// Email address
        #[arg(long)]
        email: Option<String>,
    },

    /// Sign out
    Logout {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Create your own account
    Signup,

    /// Show the signed-in profile
    Profile {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change your password
    Passwd,

    /// Show or change the color theme
    Theme {
        #[command(subcommand)]
        command: Option<profile::ThemeCommands>,
    },

    /// Contact support via WhatsApp
    Support,

    /// View and manage diagnostic logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },

    /// Manage demo mode
    Demo {
        #[command(subcommand)]
        command: Option<demo::DemoCommands>,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Calendar { .. } => "calendar",
            Commands::Day { .. } => "day",
            Commands::Add { .. } => "add",
            Commands::Show { .. } => "show",
            Commands::Status { .. } => "status",
            Commands::Edit { .. } => "edit",
            Commands::Remove { .. } => "remove",
            Commands::Users { .. } => "users",
            Commands::Login { .. } => "login",
            Commands::Logout { .. } => "logout",
            Commands::Signup => "signup",
            Commands::Profile { .. } => "profile",
            Commands::Passwd => "passwd",
            Commands::Theme { .. } => "theme",
            Commands::Support => "support",
            Commands::Logs { .. } => "logs",
            Commands::Demo { .. } => "demo",
        }
    }
}

fn main() -> ExitCode {
    if !atty::is(atty::Stream::Stdout) {
        colored::control::set_override(false);
    }

    let cli = Cli::parse();
    let command_name = cli.command.name();

    let logger = commands::get_logger();
    if let Some(l) = &logger {
        let _ = l.log_command(command_name, None);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            commands::log_event(
                &logger,
                LogEvent::new("command_failed")
                    .with_command(command_name)
                    .with_error(e.to_string()),
            );
            output::error(&format!("Error: {}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Calendar { date, json } => calendar::run(date, json),
        Commands::Day { date, json } => day::run(date, json),
        Commands::Add { title, description, date, address, client, phone } => {
            add::run(title, description, date, address, client, phone)
        }
        Commands::Show { id, json } => show::run(&id, json),
        Commands::Status { id, status } => edit::run_status(&id, &status),
        Commands::Edit { id, title, description, date, address, client, phone, status } => {
            edit::run(&id, title, description, date, address, client, phone, status)
        }
        Commands::Remove { id, force } => remove::run(&id, force),
        Commands::Users { command } => users::run(command),
        Commands::Login { email } => auth::run_login(email),
        Commands::Logout { force } => auth::run_logout(force),
        Commands::Signup => auth::run_signup(),
        Commands::Profile { json } => profile::run_profile(json),
        Commands::Passwd => profile::run_passwd(),
        Commands::Theme { command } => profile::run_theme(command),
        Commands::Support => profile::run_support(),
        Commands::Logs { command } => logs::run(command),
        Commands::Demo { command } => demo::run(command),
    }
}
