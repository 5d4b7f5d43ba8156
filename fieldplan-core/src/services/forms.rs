//! Form validation
//!
//! Input is validated before any provider call. Failures collect every
//! problem into one `ValidationError` so the user sees the full list at once.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::domain::result::{Error, Result};
use crate::domain::{InstallationStatus, NewInstallation};

/// Minimum password length accepted by the auth provider
pub const MIN_PASSWORD_LEN: usize = 6;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

/// Collects validation problems; `finish` turns them into one error
#[derive(Default)]
struct Validator {
    problems: Vec<String>,
}

impl Validator {
    fn require(&mut self, value: &str, label: &str) {
        if value.trim().is_empty() {
            self.problems.push(format!("{} is required", label));
        }
    }

    fn email(&mut self, value: &str) {
        self.require(value, "email");
        if !value.trim().is_empty() && !email_regex().is_match(value.trim()) {
            self.problems.push("email is not a valid address".to_string());
        }
    }

    fn password(&mut self, value: &str) {
        if value.len() < MIN_PASSWORD_LEN {
            self.problems.push(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            ));
        }
    }

    fn confirmation(&mut self, password: &str, confirmation: &str) {
        if password != confirmation {
            self.problems.push("passwords do not match".to_string());
        }
    }

    fn finish(self) -> Result<()> {
        if self.problems.is_empty() {
            Ok(())
        } else {
            Err(Error::validation(self.problems.join("; ")))
        }
    }
}

pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::default();
        v.email(&self.email);
        v.require(&self.password, "password");
        v.finish()
    }
}

pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirmation: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::default();
        v.require(&self.name, "name");
        v.email(&self.email);
        v.password(&self.password);
        v.confirmation(&self.password, &self.confirmation);
        v.finish()
    }
}

pub struct NewUserForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirmation: String,
    pub is_admin: bool,
}

impl NewUserForm {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::default();
        v.require(&self.name, "name");
        v.email(&self.email);
        v.password(&self.password);
        v.confirmation(&self.password, &self.confirmation);
        v.finish()
    }
}

pub struct EditUserForm {
    pub name: String,
    pub is_admin: bool,
}

impl EditUserForm {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::default();
        v.require(&self.name, "name");
        v.finish()
    }
}

pub struct InstallationForm {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub address: String,
    pub client: String,
    pub phone: String,
}

impl InstallationForm {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::default();
        v.require(&self.title, "title");
        v.require(&self.description, "description");
        v.require(&self.address, "address");
        v.require(&self.client, "client");
        v.require(&self.phone, "phone");
        v.finish()
    }

    /// Validate, then build the record to schedule
    ///
    /// New installations always start pending.
    pub fn into_new(self, created_by: &str) -> Result<NewInstallation> {
        self.validate()?;
        Ok(NewInstallation {
            title: self.title,
            description: self.description,
            date: self.date,
            address: self.address,
            client: self.client,
            phone: self.phone,
            status: InstallationStatus::Pending,
            created_by: created_by.to_string(),
        })
    }
}

pub struct PasswordChangeForm {
    pub current: String,
    pub new: String,
    pub confirmation: String,
}

impl PasswordChangeForm {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::default();
        v.require(&self.current, "current password");
        v.password(&self.new);
        v.confirmation(&self.new, &self.confirmation);
        v.finish()
    }
}
