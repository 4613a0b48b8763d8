//! Scheduled notification store - drafts waiting for their send time

use chrono::{DateTime, Utc};
use qarz_core::{Channel, NotificationDraft, KEY_SCHEDULED};
use qarz_db::KvBackend;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::JsonStore;

/// A draft to dispatch once `scheduled_for` has passed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledNotification {
    pub id: String,
    pub draft: NotificationDraft,
    pub channels: Vec<Channel>,
    pub scheduled_for: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

pub struct ScheduledStore {
    inner: JsonStore<Vec<ScheduledNotification>>,
}

impl ScheduledStore {
    pub async fn load(backend: Arc<dyn KvBackend>) -> Self {
        Self {
            inner: JsonStore::load(KEY_SCHEDULED, backend).await,
        }
    }

    pub async fn schedule(
        &self,
        draft: NotificationDraft,
        channels: Vec<Channel>,
        at: DateTime<Utc>,
    ) -> ScheduledNotification {
        let entry = ScheduledNotification {
            id: uuid::Uuid::new_v4().to_string(),
            draft,
            channels,
            scheduled_for: at,
            created_at: Utc::now(),
        };
        let stored = entry.clone();
        self.inner.mutate(|all| all.push(stored)).await;
        entry
    }

    pub async fn cancel(&self, id: &str) -> bool {
        self.inner
            .mutate(|all| {
                let before = all.len();
                all.retain(|s| s.id != id);
                all.len() != before
            })
            .await
    }

    pub async fn list(&self) -> Vec<ScheduledNotification> {
        self.inner.snapshot().await
    }

    /// Remove and return every entry due at `now`, earliest first
    pub async fn take_due(&self, now: DateTime<Utc>) -> Vec<ScheduledNotification> {
        let mut due = self
            .inner
            .mutate(|all| {
                let (due, pending): (Vec<_>, Vec<_>) =
                    all.drain(..).partition(|s| s.scheduled_for <= now);
                *all = pending;
                due
            })
            .await;
        due.sort_by_key(|s| s.scheduled_for);
        due
    }
}
