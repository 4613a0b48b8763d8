//! Rule store - manager-defined alerting rules

use qarz_core::{ManagerNotificationRule, RuleDraft, RulePatch, KEY_RULES};
use qarz_db::KvBackend;
use std::sync::Arc;
use tracing::info;

use super::JsonStore;

pub struct RuleStore {
    inner: JsonStore<Vec<ManagerNotificationRule>>,
}

impl RuleStore {
    pub async fn load(backend: Arc<dyn KvBackend>) -> Self {
        Self {
            inner: JsonStore::load(KEY_RULES, backend).await,
        }
    }

    pub async fn list(&self) -> Vec<ManagerNotificationRule> {
        self.inner.snapshot().await
    }

    /// Rules with `enabled == true`, in stored order
    pub async fn enabled(&self) -> Vec<ManagerNotificationRule> {
        self.list().await.into_iter().filter(|r| r.enabled).collect()
    }

    pub async fn get(&self, id: &str) -> Option<ManagerNotificationRule> {
        self.list().await.into_iter().find(|r| r.id == id)
    }

    pub async fn add(&self, draft: RuleDraft) -> ManagerNotificationRule {
        let rule = ManagerNotificationRule::from_draft(draft);
        info!(rule_id = %rule.id, condition = %rule.condition.describe(), "Rule added");
        let stored = rule.clone();
        self.inner.mutate(|rules| rules.push(stored)).await;
        rule
    }

    /// Apply an edit. Returns the updated rule, or `None` if the id is unknown.
    pub async fn update(&self, id: &str, patch: RulePatch) -> Option<ManagerNotificationRule> {
        self.inner
            .mutate(|rules| {
                let rule = rules.iter_mut().find(|r| r.id == id)?;
                rule.apply(patch);
                Some(rule.clone())
            })
            .await
    }

    pub async fn set_enabled(&self, id: &str, enabled: bool) -> Option<ManagerNotificationRule> {
        self.update(
            id,
            RulePatch {
                enabled: Some(enabled),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn delete(&self, id: &str) -> bool {
        self.inner
            .mutate(|rules| {
                let before = rules.len();
                rules.retain(|r| r.id != id);
                rules.len() != before
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qarz_core::{Channel, Priority, RuleCondition};
    use qarz_db::MemoryBackend;

    fn draft(threshold: i64) -> RuleDraft {
        RuleDraft {
            name: format!("debt over {}", threshold),
            condition: RuleCondition::HighDebt { threshold },
            recipients: vec!["admin-1".into()],
            channels: vec![Channel::InApp],
            priority: Priority::High,
            enabled: true,
        }
    }

    #[tokio::test]
    async fn test_add_update_delete() {
        let backend = Arc::new(MemoryBackend::new());
        let store = RuleStore::load(backend.clone()).await;

        let rule = store.add(draft(100)).await;
        store.add(draft(200)).await;
        assert_eq!(store.list().await.len(), 2);

        let updated = store
            .update(
                &rule.id,
                RulePatch {
                    recipients: Some(vec!["admin-2".into()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.recipients, vec!["admin-2".to_string()]);
        assert!(updated.updated_at >= rule.updated_at);
        assert!(store.update("missing", RulePatch::default()).await.is_none());

        assert!(store.delete(&rule.id).await);
        assert!(!store.delete(&rule.id).await);

        let reloaded = RuleStore::load(backend).await;
        assert_eq!(reloaded.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_enabled_filter() {
        let store = RuleStore::load(Arc::new(MemoryBackend::new())).await;
        let a = store.add(draft(1)).await;
        store.add(draft(2)).await;

        store.set_enabled(&a.id, false).await.unwrap();
        let enabled = store.enabled().await;
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].condition, RuleCondition::HighDebt { threshold: 2 });
    }
}
