//! Users command - account administration

use anyhow::{bail, Result};
use clap::Subcommand;
use dialoguer::{Confirm, Input, Password};

use fieldplan_core::services::NewUserForm;
use fieldplan_core::UserUpdate;

use super::{get_context, require_admin, spinner};
use crate::output;

#[derive(Subcommand)]
pub enum UsersCommands {
    /// List all users
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new user account
    Add {
        /// Full name
        #[arg(long)]
        name: Option<String>,
        /// Email address
        #[arg(long)]
        email: Option<String>,
        /// Grant administrator rights
        #[arg(long)]
        admin: bool,
    },
    /// Edit a user's name or role
    Edit {
        /// User id
        id: String,
        /// New full name
        #[arg(long)]
        name: Option<String>,
        /// Set the administrator flag
        #[arg(long)]
        admin: Option<bool>,
    },
    /// Remove a user's profile record
    Remove {
        /// User id
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

/// Removing the account you are signed in with would strand the session
fn ensure_not_self(target_id: &str, current_uid: &str) -> Result<()> {
    if target_id == current_uid {
        bail!("you cannot remove your own account");
    }
    Ok(())
}

pub fn run(command: UsersCommands) -> Result<()> {
    let context = get_context()?;
    let admin = require_admin(&context)?;

    match command {
        UsersCommands::List { json } => {
            let users = context.user_service.get_all()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&users)?);
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["Name", "Email", "Role", "Created", "ID"]);
            for user in &users {
                table.add_row(vec![
                    user.name.clone(),
                    user.email.clone(),
                    if user.is_admin { "administrator" } else { "technician" }.to_string(),
                    output::format_local(user.created_at),
                    user.id.clone(),
                ]);
            }
            println!("{}", table);
        }

        UsersCommands::Add { name, email, admin: is_admin } => {
            let name: String = match name {
                Some(n) => n,
                None => Input::new().with_prompt("Name").interact_text()?,
            };
            let email: String = match email {
                Some(e) => e,
                None => Input::new().with_prompt("Email").interact_text()?,
            };
            let password = Password::new().with_prompt("Password").interact()?;
            let confirmation = Password::new().with_prompt("Confirm password").interact()?;

            let form = NewUserForm {
                name,
                email,
                password,
                confirmation,
                is_admin,
            };
            form.validate()?;

            if context.user_service.email_exists(&form.email)? {
                bail!("a user with email {} already exists", form.email);
            }

            let _busy = context.session.begin_busy();
            let pb = spinner("Creating user...");
            let result = context.user_service.create(
                &form.name,
                &form.email,
                &form.password,
                form.is_admin,
            );
            pb.finish_and_clear();
            let uid = result?;

            output::success(&format!("User created: {} ({})", form.name, uid));
        }

        UsersCommands::Edit { id, name, admin: admin_flag } => {
            if let Some(n) = &name {
                if n.trim().is_empty() {
                    bail!("name cannot be empty");
                }
            }

            let update = UserUpdate {
                name,
                is_admin: admin_flag,
            };
            if update.is_empty() {
                output::warning("Nothing to update; pass --name and/or --admin.");
                return Ok(());
            }

            let _busy = context.session.begin_busy();
            let pb = spinner("Updating user...");
            let result = context.user_service.update(&id, &update);
            pb.finish_and_clear();
            result?;

            output::success(&format!("User {} updated", id));
        }

        UsersCommands::Remove { id, force } => {
            ensure_not_self(&id, &admin.uid)?;

            let user = context.user_service.get_by_id(&id)?;

            if !force {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Remove user '{}' ({})?", user.name, user.email))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let _busy = context.session.begin_busy();
            let pb = spinner("Removing user...");
            let result = context.user_service.remove(&id);
            pb.finish_and_clear();
            result?;

            output::success(&format!("User {} removed", id));
            output::warning("The sign-in credential still exists; revoke it in the provider console.");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cannot_remove_own_account() {
        assert!(ensure_not_self("uid-1", "uid-1").is_err());
        assert!(ensure_not_self("uid-2", "uid-1").is_ok());
    }
}
