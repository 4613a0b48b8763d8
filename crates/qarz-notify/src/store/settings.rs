//! Settings store - one record per user

use qarz_core::{NotificationSettings, NotificationSettingsPatch, KEY_SETTINGS};
use qarz_db::KvBackend;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::JsonStore;

pub struct SettingsStore {
    inner: JsonStore<BTreeMap<String, NotificationSettings>>,
}

impl SettingsStore {
    pub async fn load(backend: Arc<dyn KvBackend>) -> Self {
        Self {
            inner: JsonStore::load(KEY_SETTINGS, backend).await,
        }
    }

    /// Settings for a user, or the defaults if none are stored
    pub async fn get(&self, user_id: &str) -> NotificationSettings {
        self.inner
            .snapshot()
            .await
            .remove(user_id)
            .unwrap_or_default()
    }

    /// Merge a partial update onto the user's record
    pub async fn update(&self, user_id: &str, patch: NotificationSettingsPatch) -> NotificationSettings {
        self.inner
            .mutate(|all| {
                let settings = all.entry(user_id.to_string()).or_default();
                settings.apply(patch);
                settings.clone()
            })
            .await
    }

    /// Overwrite the user's record
    pub async fn replace(&self, user_id: &str, settings: NotificationSettings) {
        self.inner
            .mutate(|all| {
                all.insert(user_id.to_string(), settings);
            })
            .await;
    }
}
