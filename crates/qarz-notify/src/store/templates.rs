//! Template store - message patterns per notification type

use qarz_core::{Channel, NotificationKind, NotificationTemplate, KEY_TEMPLATES};
use qarz_db::KvBackend;
use std::sync::Arc;

use super::JsonStore;

pub struct TemplateStore {
    inner: JsonStore<Vec<NotificationTemplate>>,
}

impl TemplateStore {
    /// Load templates, seeding the defaults when nothing is stored yet
    pub async fn load(backend: Arc<dyn KvBackend>) -> Self {
        Self {
            inner: JsonStore::load_or(KEY_TEMPLATES, backend, default_templates()).await,
        }
    }

    pub async fn list(&self) -> Vec<NotificationTemplate> {
        self.inner.snapshot().await
    }

    /// First active template of a type.
    ///
    /// Uniqueness is not enforced; with several active templates of the same
    /// type the earliest stored one wins.
    pub async fn find_active(&self, kind: NotificationKind) -> Option<NotificationTemplate> {
        self.list()
            .await
            .into_iter()
            .find(|t| t.kind == kind && t.is_active)
    }

    /// Insert a template, or replace the one with the same id
    pub async fn upsert(&self, template: NotificationTemplate) {
        self.inner
            .mutate(|all| match all.iter_mut().find(|t| t.id == template.id) {
                Some(existing) => *existing = template,
                None => all.push(template),
            })
            .await;
    }

    pub async fn set_active(&self, id: &str, active: bool) -> bool {
        self.inner
            .mutate(|all| match all.iter_mut().find(|t| t.id == id) {
                Some(t) => {
                    t.is_active = active;
                    true
                }
                None => false,
            })
            .await
    }

    pub async fn remove(&self, id: &str) -> bool {
        self.inner
            .mutate(|all| {
                let before = all.len();
                all.retain(|t| t.id != id);
                all.len() != before
            })
            .await
    }
}

fn template(
    id: &str,
    name: &str,
    kind: NotificationKind,
    title: &str,
    message: &str,
    variables: &[&str],
) -> NotificationTemplate {
    NotificationTemplate {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        title_template: title.to_string(),
        message_template: message.to_string(),
        channels: vec![Channel::InApp, Channel::Sms],
        is_active: true,
        variables: variables.iter().map(|v| v.to_string()).collect(),
    }
}

/// Built-in Kurdish templates for the template-driven notification types
pub fn default_templates() -> Vec<NotificationTemplate> {
    vec![
        template(
            "default-debt-added",
            "قەرزی نوێ",
            NotificationKind::DebtAdded,
            "قەرزی نوێ تۆمارکرا",
            "قەرزێکی نوێ بە بڕی {{amount}} دینار بۆ {{customerName}} تۆمارکرا. کۆی قەرز: {{totalDebt}} دینار",
            &["customerName", "amount", "totalDebt"],
        ),
        template(
            "default-payment-received",
            "پارەدان",
            NotificationKind::PaymentReceived,
            "پارەدان وەرگیرا",
            "بڕی {{amount}} دینار لە {{customerName}} وەرگیرا. قەرزی ماوە: {{remainingDebt}} دینار",
            &["customerName", "amount", "remainingDebt"],
        ),
        template(
            "default-high-debt-warning",
            "ئاگاداری قەرزی زۆر",
            NotificationKind::HighDebtWarning,
            "ئاگاداری قەرزی زۆر",
            "قەرزی {{customerName}} گەیشتە {{totalDebt}} دینار و لە سنووری {{threshold}} دینار تێپەڕی",
            &["customerName", "totalDebt", "threshold"],
        ),
        template(
            "default-receipt",
            "پسوڵە",
            NotificationKind::Receipt,
            "پسوڵەی پارەدان",
            "پسوڵەی ژمارە {{receiptNumber}} بۆ {{customerName}} بە بڕی {{amount}} دینار دروستکرا",
            &["receiptNumber", "customerName", "amount"],
        ),
        template(
            "default-manager-alert",
            "ئاگاداری بەڕێوەبەر",
            NotificationKind::ManagerAlert,
            "{{title}}",
            "{{message}}",
            &["title", "message"],
        ),
    ]
}
