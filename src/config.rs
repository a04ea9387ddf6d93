use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Which hardware the controller is running on. Decides the entry screen and
/// whether the active screen is persisted across reloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Kiosk,
    Mobile,
}

fn default_language() -> String {
    "en_US".to_string()
}

fn default_timeout() -> u64 {
    15
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KioskConfig {
    pub base_url: String,
    pub station_id: i64,
    pub token: String,
    pub device_class: DeviceClass,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Where the mobile device class persists the active screen. Unused for
    /// kiosks.
    #[serde(default)]
    pub screen_state_path: Option<String>,
}

impl KioskConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid config in {}", path.display()))
    }
}
