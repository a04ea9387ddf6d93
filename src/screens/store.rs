use std::{
    fs,
    path::PathBuf,
    sync::{Mutex, RwLock},
};

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

/// Per-tab ephemeral storage for the mobile device class: a page reload must
/// restore the screen the visitor was on. Stored names that no longer resolve
/// in the registry fall back to the default entry screen at restore time.
pub trait ScreenStore: Send + Sync {
    fn save(&self, screen_name: &str);
    fn load(&self) -> Option<String>;
}

/// No-op persistence for the kiosk device class and for tests that do not
/// care about reload behavior.
#[derive(Default)]
pub struct MemoryScreenStore {
    current: Mutex<Option<String>>,
}

impl MemoryScreenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScreenStore for MemoryScreenStore {
    fn save(&self, screen_name: &str) {
        *self.current.lock().unwrap() = Some(screen_name.to_string());
    }

    fn load(&self) -> Option<String> {
        self.current.lock().unwrap().clone()
    }
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct StoredScreen {
    screen: Option<String>,
}

/// JSON-file-backed store used by the mobile binary.
pub struct FileScreenStore {
    path: PathBuf,
    data: RwLock<StoredScreen>,
}

impl FileScreenStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read screen state from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            StoredScreen::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    fn persist(&self, data: &StoredScreen) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write screen state to {}", self.path.display()))
    }
}

impl ScreenStore for FileScreenStore {
    fn save(&self, screen_name: &str) {
        let mut guard = self.data.write().unwrap();
        guard.screen = Some(screen_name.to_string());
        if let Err(err) = self.persist(&guard) {
            warn!("screen state not persisted: {err:#}");
        }
    }

    fn load(&self) -> Option<String> {
        self.data.read().unwrap().screen.clone()
    }
}
