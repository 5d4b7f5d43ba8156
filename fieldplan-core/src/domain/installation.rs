//! Installation domain model
//!
//! An installation is one scheduled field-service appointment. The scheduled
//! date is always an absolute instant; the wire representation (epoch millis)
//! is handled at the service boundary, never here.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::result::Error;

/// Lifecycle status of an installation appointment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallationStatus {
    Pending,
    Completed,
    Cancelled,
}

impl InstallationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstallationStatus::Pending => "pending",
            InstallationStatus::Completed => "completed",
            InstallationStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for InstallationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstallationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InstallationStatus::Pending),
            "completed" => Ok(InstallationStatus::Completed),
            "cancelled" => Ok(InstallationStatus::Cancelled),
            other => Err(Error::validation(format!(
                "unknown status '{}' (expected pending, completed or cancelled)",
                other
            ))),
        }
    }
}

/// A scheduled field-service appointment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installation {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub address: String,
    pub client: String,
    pub phone: String,
    pub status: InstallationStatus,
    /// Uid of the creating user, immutable after creation
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when scheduling a new installation
///
/// The identifier is assigned by the store and the creation timestamp is set
/// by the service, so neither appears here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInstallation {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub address: String,
    pub client: String,
    pub phone: String,
    pub status: InstallationStatus,
    pub created_by: String,
}

/// Explicit per-field update for an installation
///
/// Only set fields are written; `created_by` and `created_at` are never
/// updated.
#[derive(Debug, Clone, Default)]
pub struct InstallationUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub address: Option<String>,
    pub client: Option<String>,
    pub phone: Option<String>,
    pub status: Option<InstallationStatus>,
}

impl InstallationUpdate {
    /// Update carrying only a status change
    pub fn status(status: InstallationStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.address.is_none()
            && self.client.is_none()
            && self.phone.is_none()
            && self.status.is_none()
    }
}
