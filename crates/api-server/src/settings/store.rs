use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use taskdash_core::Result;

use super::UserSettings;

/// Per-user preferences held in memory
#[derive(Clone, Default)]
pub struct SettingsStore {
    settings: Arc<RwLock<HashMap<Uuid, UserSettings>>>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored preferences, or the defaults when the user has saved none
    pub async fn get(&self, user_id: Uuid) -> UserSettings {
        let settings = self.settings.read().await;
        settings.get(&user_id).cloned().unwrap_or_default()
    }

    pub async fn put(&self, user_id: Uuid, settings: UserSettings) -> Result<UserSettings> {
        settings.validate()?;
        let mut all = self.settings.write().await;
        all.insert(user_id, settings.clone());
        Ok(settings)
    }

    pub async fn toggle_theme(&self, user_id: Uuid) -> UserSettings {
        let mut all = self.settings.write().await;
        let entry = all.entry(user_id).or_default();
        entry.theme = entry.theme.toggled();
        entry.clone()
    }
}
