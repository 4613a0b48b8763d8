//! Notification store - newest-first list with read state

use chrono::Utc;
use qarz_core::{Notification, KEY_NOTIFICATIONS};
use qarz_db::KvBackend;
use std::sync::Arc;

use super::JsonStore;

/// Ordered notification records, most recent first
pub struct NotificationStore {
    inner: JsonStore<Vec<Notification>>,
}

impl NotificationStore {
    pub async fn load(backend: Arc<dyn KvBackend>) -> Self {
        Self {
            inner: JsonStore::load(KEY_NOTIFICATIONS, backend).await,
        }
    }

    /// Prepend a notification, stamping `created_at` under the store lock
    /// so the list stays ordered newest first
    pub async fn add(&self, mut notification: Notification) -> Notification {
        self.inner
            .mutate(|list| {
                notification.created_at = Utc::now();
                list.insert(0, notification.clone());
                notification
            })
            .await
    }

    /// All notifications, newest first
    pub async fn list(&self) -> Vec<Notification> {
        self.inner.snapshot().await
    }

    /// Notifications owned by a user, newest first
    pub async fn for_user(&self, user_id: &str) -> Vec<Notification> {
        self.list()
            .await
            .into_iter()
            .filter(|n| n.user_id == user_id)
            .collect()
    }

    pub async fn get(&self, id: &str) -> Option<Notification> {
        self.list().await.into_iter().find(|n| n.id == id)
    }

    pub async fn unread_count(&self) -> usize {
        self.list().await.iter().filter(|n| !n.is_read).count()
    }

    pub async fn unread_count_for(&self, user_id: &str) -> usize {
        self.list()
            .await
            .iter()
            .filter(|n| n.user_id == user_id && !n.is_read)
            .count()
    }

    /// Mark one notification read. Returns false if the id is unknown.
    pub async fn mark_as_read(&self, id: &str) -> bool {
        self.inner
            .mutate(|list| match list.iter_mut().find(|n| n.id == id) {
                Some(n) => {
                    n.is_read = true;
                    true
                }
                None => false,
            })
            .await
    }

    /// Mark every notification read, returning how many changed
    pub async fn mark_all_as_read(&self) -> usize {
        self.inner.mutate(|list| mark_read(list, |_| true)).await
    }

    /// Mark every notification of one user read, returning how many changed
    pub async fn mark_all_as_read_for(&self, user_id: &str) -> usize {
        self.inner
            .mutate(|list| mark_read(list, |n| n.user_id == user_id))
            .await
    }

    pub async fn remove(&self, id: &str) -> bool {
        self.inner
            .mutate(|list| {
                let before = list.len();
                list.retain(|n| n.id != id);
                list.len() != before
            })
            .await
    }

    pub async fn clear(&self) {
        self.inner.save_all(Vec::new()).await;
    }
}

fn mark_read(list: &mut [Notification], pred: impl Fn(&Notification) -> bool) -> usize {
    let mut changed = 0;
    for n in list.iter_mut().filter(|n| !n.is_read && pred(n)) {
        n.is_read = true;
        changed += 1;
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use qarz_core::{Channel, NotificationDraft, NotificationKind};
    use qarz_db::MemoryBackend;

    fn notification(user: &str, title: &str) -> Notification {
        let draft = NotificationDraft::new(NotificationKind::DebtAdded, user, title, "body");
        Notification::from_draft(draft, &[Channel::InApp])
    }

    #[tokio::test]
    async fn test_newest_first() {
        let store = NotificationStore::load(Arc::new(MemoryBackend::new())).await;
        store.add(notification("u1", "first")).await;
        store.add(notification("u1", "second")).await;

        let list = store.list().await;
        assert_eq!(list[0].title, "second");
        assert_eq!(list[1].title, "first");
        assert!(list[0].created_at >= list[1].created_at);
    }

    #[tokio::test]
    async fn test_created_at_follows_insertion_order() {
        let store = NotificationStore::load(Arc::new(MemoryBackend::new())).await;
        let mut stale = notification("u1", "built later");
        stale.created_at = Utc::now() + chrono::Duration::hours(1);
        let early = notification("u1", "built early");

        store.add(stale).await;
        let stored = store.add(early).await;

        let list = store.list().await;
        assert_eq!(list[0].id, stored.id);
        assert_eq!(list[0].created_at, stored.created_at);
        assert!(list[0].created_at >= list[1].created_at);
    }

    #[tokio::test]
    async fn test_unread_count_and_mark_all() {
        let backend = Arc::new(MemoryBackend::new());
        let store = NotificationStore::load(backend.clone()).await;
        store.add(notification("u1", "a")).await;
        store.add(notification("u1", "b")).await;
        store.add(notification("u2", "c")).await;
        assert_eq!(store.unread_count().await, 3);
        assert_eq!(store.unread_count_for("u1").await, 2);

        assert_eq!(store.mark_all_as_read().await, 3);
        assert_eq!(store.unread_count().await, 0);

        let reloaded = NotificationStore::load(backend).await;
        assert_eq!(reloaded.unread_count().await, 0);
        assert_eq!(reloaded.list().await.len(), 3);
    }

    #[tokio::test]
    async fn test_mark_as_read_and_per_user() {
        let store = NotificationStore::load(Arc::new(MemoryBackend::new())).await;
        let a = notification("u1", "a");
        let a_id = a.id.clone();
        store.add(a).await;
        store.add(notification("u2", "b")).await;

        assert!(store.mark_as_read(&a_id).await);
        assert!(!store.mark_as_read("missing").await);
        assert!(store.get(&a_id).await.unwrap().is_read);

        assert_eq!(store.mark_all_as_read_for("u2").await, 1);
        assert_eq!(store.mark_all_as_read_for("u2").await, 0);
        assert_eq!(store.for_user("u2").await.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let backend = Arc::new(MemoryBackend::new());
        let store = NotificationStore::load(backend.clone()).await;
        let a = notification("u1", "a");
        let a_id = a.id.clone();
        store.add(a).await;
        store.add(notification("u1", "b")).await;

        assert!(store.remove(&a_id).await);
        assert!(!store.remove(&a_id).await);
        assert_eq!(store.list().await.len(), 1);

        store.clear().await;
        assert!(store.list().await.is_empty());
        assert_eq!(backend.get_json(KEY_NOTIFICATIONS).await, Some(serde_json::json!([])));
    }
}
