//! Theme palettes
//!
//! The light/dark preference is the only locally persisted user state (see
//! `config`). Colors are hex strings consumed by the calendar marker
//! aggregation and the CLI renderer.

use serde::{Deserialize, Serialize};

/// Persisted theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

/// Color palette for one theme mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub primary: &'static str,
    pub success: &'static str,
    pub warning: &'static str,
    pub error: &'static str,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            primary: "#6200ee",
            success: "#4CAF50",
            warning: "#FF9800",
            error: "#B00020",
        }
    }

    pub fn dark() -> Self {
        Self {
            primary: "#bb86fc",
            success: "#81c784",
            warning: "#ffb74d",
            error: "#cf6679",
        }
    }

    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
        }
    }
}
