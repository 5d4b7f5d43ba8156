//! Configuration management
//!
//! Settings live in a `settings.json` in the app directory:
//! ```json
//! {
//!   "app": { "demoMode": false, "theme": "light", "supportPhone": "5511999999999" },
//!   "backend": { "apiKey": "...", "authUrl": "https://...", "storeUrl": "https://..." }
//! }
//! ```
//! Saving preserves fields this client does not manage.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::theme::ThemeMode;

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(default)]
    backend: Option<BackendSettings>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    demo_mode: bool,
    #[serde(default)]
    theme: ThemeMode,
    #[serde(default)]
    support_phone: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Connection settings for the hosted backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendSettings {
    pub api_key: String,
    pub auth_url: String,
    pub store_url: String,
}

/// Fieldplan configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub demo_mode: bool,
    pub theme: ThemeMode,
    pub support_phone: Option<String>,
    pub backend: Option<BackendSettings>,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            demo_mode: false,
            theme: ThemeMode::Light,
            support_phone: None,
            backend: None,
            _raw_settings: SettingsFile::default(),
        }
    }
}

impl Config {
    /// Load config from the app directory
    ///
    /// Demo mode can be enabled via:
    /// 1. Settings file (fp demo on)
    /// 2. Environment variable FIELDPLAN_DEMO_MODE (for CI/testing)
    pub fn load(app_dir: &Path) -> Result<Self> {
        let settings_path = app_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let demo_mode = match std::env::var("FIELDPLAN_DEMO_MODE").ok().as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => false,
            _ => raw.app.demo_mode,
        };

        Ok(Self {
            demo_mode,
            theme: raw.app.theme,
            support_phone: raw.app.support_phone.clone(),
            backend: raw.backend.clone(),
            _raw_settings: raw,
        })
    }

    /// Save config to the app directory
    /// Preserves settings this client doesn't manage
    pub fn save(&self, app_dir: &Path) -> Result<()> {
        let settings_path = app_dir.join("settings.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        settings.app.demo_mode = self.demo_mode;
        settings.app.theme = self.theme;
        settings.app.support_phone = self.support_phone.clone();
        settings.backend = self.backend.clone();

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Set the persisted theme preference
    pub fn set_theme(&mut self, theme: ThemeMode) {
        self.theme = theme;
    }

    /// Enable demo mode
    pub fn enable_demo_mode(&mut self) {
        self.demo_mode = true;
    }

    /// Disable demo mode
    pub fn disable_demo_mode(&mut self) {
        self.demo_mode = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_settings_file_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(!config.demo_mode);
        assert_eq!(config.theme, ThemeMode::Light);
        assert!(config.backend.is_none());
    }

    #[test]
    fn test_theme_roundtrip() {
        let dir = tempdir().unwrap();
        let mut config = Config::load(dir.path()).unwrap();
        config.set_theme(ThemeMode::Dark);
        config.save(dir.path()).unwrap();

        let reloaded = Config::load(dir.path()).unwrap();
        assert_eq!(reloaded.theme, ThemeMode::Dark);
    }

    #[test]
    fn test_save_preserves_unmanaged_fields() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"app": {"demoMode": false, "experimental": true}}"#,
        )
        .unwrap();

        let mut config = Config::load(dir.path()).unwrap();
        config.enable_demo_mode();
        config.save(dir.path()).unwrap();

        let content = std::fs::read_to_string(dir.path().join("settings.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["app"]["experimental"], serde_json::json!(true));
        assert_eq!(value["app"]["demoMode"], serde_json::json!(true));
    }

    #[test]
    fn test_backend_settings_parse() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"backend": {"apiKey": "k", "authUrl": "https://a", "storeUrl": "https://s"}}"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        let backend = config.backend.unwrap();
        assert_eq!(backend.api_key, "k");
        assert_eq!(backend.store_url, "https://s");
    }
}
