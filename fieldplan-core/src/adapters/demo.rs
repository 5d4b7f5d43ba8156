//! Demo data for the in-memory backend
//!
//! Generates a small, realistic installation schedule around today so every
//! command is exercisable offline: mixed statuses on the same day, work on
//! adjacent days, and both an administrator and a regular technician account.

use chrono::{Duration, Local, NaiveTime, TimeZone, Utc};

use crate::domain::{InstallationStatus, NewInstallation};

/// Demo administrator sign-in
pub const DEMO_ADMIN_EMAIL: &str = "admin@fieldplan.demo";
pub const DEMO_ADMIN_PASSWORD: &str = "demo-admin";

/// Demo technician sign-in
pub const DEMO_TECH_EMAIL: &str = "tech@fieldplan.demo";
pub const DEMO_TECH_PASSWORD: &str = "demo-tech";

pub const DEMO_ADMIN_UID: &str = "demo-admin-0000000000";
pub const DEMO_TECH_UID: &str = "demo-tech-00000000000";

/// A demo account: (uid, name, email, password, is_admin)
pub fn demo_accounts() -> Vec<(&'static str, &'static str, &'static str, &'static str, bool)> {
    vec![
        (
            DEMO_ADMIN_UID,
            "Demo Administrator",
            DEMO_ADMIN_EMAIL,
            DEMO_ADMIN_PASSWORD,
            true,
        ),
        (
            DEMO_TECH_UID,
            "Demo Technician",
            DEMO_TECH_EMAIL,
            DEMO_TECH_PASSWORD,
            false,
        ),
    ]
}

/// Generate demo installations spread over yesterday, today and tomorrow
pub fn generate_demo_installations() -> Vec<NewInstallation> {
    let today = Local::now().date_naive();
    let at = |day_offset: i64, hour: u32| {
        let date = today + Duration::days(day_offset);
        let naive = date.and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN));
        naive
            .and_local_timezone(Local)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
    };

    vec![
        NewInstallation {
            title: "Fiber uplink install".to_string(),
            description: "New 1 Gbps fiber drop, router placement in the hallway".to_string(),
            date: at(0, 9),
            address: "Rua das Acácias 120, São Paulo".to_string(),
            client: "Padaria Central".to_string(),
            phone: "+55 11 91234-0001".to_string(),
            status: InstallationStatus::Pending,
            created_by: DEMO_ADMIN_UID.to_string(),
        },
        NewInstallation {
            title: "Router swap".to_string(),
            description: "Replace failing CPE, keep existing cabling".to_string(),
            date: at(0, 14),
            address: "Av. Paulista 900, São Paulo".to_string(),
            client: "Escritório Lumen".to_string(),
            phone: "+55 11 91234-0002".to_string(),
            status: InstallationStatus::Completed,
            created_by: DEMO_TECH_UID.to_string(),
        },
        NewInstallation {
            title: "Site survey".to_string(),
            description: "Roof access needed, check line of sight to tower".to_string(),
            date: at(-1, 10),
            address: "Rua Harmonia 55, São Paulo".to_string(),
            client: "Condomínio Vila Nova".to_string(),
            phone: "+55 11 91234-0003".to_string(),
            status: InstallationStatus::Cancelled,
            created_by: DEMO_ADMIN_UID.to_string(),
        },
        NewInstallation {
            title: "Antenna alignment".to_string(),
            description: "Customer reports intermittent signal after storm".to_string(),
            date: at(1, 8),
            address: "Estrada do Campo 3km, Cotia".to_string(),
            client: "Sítio Boa Vista".to_string(),
            phone: "+55 11 91234-0004".to_string(),
            status: InstallationStatus::Pending,
            created_by: DEMO_TECH_UID.to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_data_shape() {
        let accounts = demo_accounts();
        assert_eq!(accounts.len(), 2);
        assert!(accounts.iter().any(|(_, _, _, _, is_admin)| *is_admin));

        let installations = generate_demo_installations();
        assert!(installations.len() >= 3);
        assert!(installations
            .iter()
            .any(|i| i.status == InstallationStatus::Cancelled));
    }
}
