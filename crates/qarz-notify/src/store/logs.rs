//! Delivery log store - append-only channel attempts

use qarz_core::{NotificationLog, KEY_LOGS};
use qarz_db::KvBackend;
use std::sync::Arc;

use super::JsonStore;

pub struct LogStore {
    inner: JsonStore<Vec<NotificationLog>>,
}

impl LogStore {
    pub async fn load(backend: Arc<dyn KvBackend>) -> Self {
        Self {
            inner: JsonStore::load(KEY_LOGS, backend).await,
        }
    }

    /// Append one dispatch's logs in a single write, preserving their order
    pub async fn append_batch(&self, logs: Vec<NotificationLog>) {
        if logs.is_empty() {
            return;
        }
        self.inner.mutate(|all| all.extend(logs)).await;
    }

    pub async fn list(&self) -> Vec<NotificationLog> {
        self.inner.snapshot().await
    }

    pub async fn for_notification(&self, notification_id: &str) -> Vec<NotificationLog> {
        self.list()
            .await
            .into_iter()
            .filter(|l| l.notification_id == notification_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qarz_core::{Channel, DeliveryStatus};
    use qarz_db::MemoryBackend;

    #[tokio::test]
    async fn test_append_batch_keeps_order() {
        let backend = Arc::new(MemoryBackend::new());
        let store = LogStore::load(backend.clone()).await;

        store
            .append_batch(vec![
                NotificationLog::new("n1", Channel::Sms, DeliveryStatus::Delivered),
                NotificationLog::failed("n1", Channel::Email, "no address"),
            ])
            .await;
        store
            .append_batch(vec![NotificationLog::new("n2", Channel::InApp, DeliveryStatus::Sent)])
            .await;

        let n1 = store.for_notification("n1").await;
        assert_eq!(n1.len(), 2);
        assert_eq!(n1[0].channel, Channel::Sms);
        assert_eq!(n1[1].channel, Channel::Email);

        let reloaded = LogStore::load(backend).await;
        assert_eq!(reloaded.list().await.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_batch_skips_write() {
        let backend = Arc::new(MemoryBackend::new());
        let store = LogStore::load(backend.clone()).await;
        store.append_batch(Vec::new()).await;
        assert_eq!(backend.write_count(), 0);
    }
}
