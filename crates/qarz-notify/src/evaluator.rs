//! Rule evaluator - match business events against manager rules

use futures::future::join_all;
use qarz_core::{
    format_amount, BusinessEvent, ManagerNotificationRule, Notification, NotificationDraft,
    RecipientType, RuleCondition,
};
use std::sync::Arc;
use tracing::{debug, info};

use crate::dispatch::Dispatcher;
use crate::store::RuleStore;

/// Whether a rule condition fires for an event.
///
/// Thresholds are inclusive; expiry windows match when the remaining days
/// are at or below the configured number.
pub fn matches(condition: &RuleCondition, event: &BusinessEvent) -> bool {
    match (condition, event) {
        (RuleCondition::HighDebt { threshold }, BusinessEvent::DebtAdded { amount, .. }) => {
            amount >= threshold
        }
        (RuleCondition::OverdueDebt { days }, BusinessEvent::DebtOverdue { days_overdue, .. }) => {
            days_overdue >= days
        }
        (
            RuleCondition::LargePayment { threshold },
            BusinessEvent::PaymentReceived { amount, .. },
        ) => amount >= threshold,
        (
            RuleCondition::CustomerInactive { days },
            BusinessEvent::CustomerInactive { inactive_days, .. },
        ) => inactive_days >= days,
        (RuleCondition::StaffActivity { action }, BusinessEvent::StaffActivity { action: a, .. }) => {
            a == action
        }
        (
            RuleCondition::SystemError { severity },
            BusinessEvent::SystemError { severity: s, .. },
        ) => s == severity,
        (RuleCondition::BackupFailed, BusinessEvent::BackupFailed { .. }) => true,
        (
            RuleCondition::SubscriptionExpiring { days },
            BusinessEvent::SubscriptionExpiring { days_until_expiry },
        ) => days_until_expiry <= days,
        _ => false,
    }
}

/// Title and message for a rule-triggered notification
pub fn rule_message(event: &BusinessEvent) -> (String, String) {
    match event {
        BusinessEvent::DebtAdded {
            amount,
            customer_name,
            ..
        } => (
            "ئاگاداری قەرزی زۆر".to_string(),
            format!(
                "قەرزێکی {} دیناری بۆ {} زیادکرا",
                format_amount(*amount),
                customer_name
            ),
        ),
        BusinessEvent::DebtOverdue {
            amount,
            customer_name,
            days_overdue,
            ..
        } => (
            "قەرزی دواکەوتوو".to_string(),
            format!(
                "قەرزی {} بە بڕی {} دینار {} ڕۆژە دواکەوتووە",
                customer_name,
                format_amount(*amount),
                days_overdue
            ),
        ),
        BusinessEvent::PaymentReceived {
            amount,
            customer_name,
            ..
        } => (
            "پارەدانی گەورە".to_string(),
            format!(
                "{} بڕی {} دیناری پارەدا",
                customer_name,
                format_amount(*amount)
            ),
        ),
        BusinessEvent::CustomerInactive {
            customer_name,
            inactive_days,
            ..
        } => (
            "کڕیاری ناچالاک".to_string(),
            format!(
                "{} ماوەی {} ڕۆژە هیچ مامەڵەیەکی نەکردووە",
                customer_name, inactive_days
            ),
        ),
        BusinessEvent::StaffActivity { staff_name, action } => (
            "چالاکی کارمەند".to_string(),
            format!("{} ئەم کارەی ئەنجامدا: {}", staff_name, action),
        ),
        BusinessEvent::SystemError { severity, message } => (
            "هەڵەی سیستەم".to_string(),
            format!("هەڵەیەکی {} ڕوویدا: {}", severity, message),
        ),
        BusinessEvent::BackupFailed { reason } => {
            let message = if reason.is_empty() {
                "باکئەپی داتاکان سەرکەوتوو نەبوو".to_string()
            } else {
                format!("باکئەپی داتاکان سەرکەوتوو نەبوو: {}", reason)
            };
            ("باکئەپ سەرکەوتوو نەبوو".to_string(), message)
        }
        BusinessEvent::SubscriptionExpiring { days_until_expiry } => (
            "بەسەرچوونی بەشداریکردن".to_string(),
            format!("بەشداریکردنەکەت {} ڕۆژی تر بەسەردەچێت", days_until_expiry),
        ),
    }
}

/// One draft per recipient of a matching rule
fn drafts_for(rule: &ManagerNotificationRule, event: &BusinessEvent) -> Vec<NotificationDraft> {
    let (title, message) = rule_message(event);
    let metadata = event.metadata();
    let customer_id = event.customer_id().map(str::to_string);

    rule.recipients
        .iter()
        .map(|recipient| {
            NotificationDraft::new(
                rule.condition.notification_kind(),
                recipient.clone(),
                title.clone(),
                message.clone(),
            )
            .with_recipient(recipient.clone(), RecipientType::Admin)
            .with_priority(rule.priority)
            .with_customer(customer_id.clone())
            .with_related(rule.id.clone())
            .with_metadata(metadata.clone())
        })
        .collect()
}

pub struct RuleEvaluator {
    rules: Arc<RuleStore>,
    dispatcher: Arc<Dispatcher>,
}

impl RuleEvaluator {
    pub fn new(rules: Arc<RuleStore>, dispatcher: Arc<Dispatcher>) -> Self {
        Self { rules, dispatcher }
    }

    /// Dispatch a notification to every recipient of every enabled rule the
    /// event matches. Rules are independent, so overlapping rules notify the
    /// same recipient more than once.
    pub async fn evaluate(&self, event: &BusinessEvent) -> Vec<Notification> {
        let mut jobs = Vec::new();
        for rule in self.rules.enabled().await {
            if !matches(&rule.condition, event) {
                continue;
            }
            info!(
                rule_id = %rule.id,
                event = event.event_type(),
                recipients = rule.recipients.len(),
                "Rule matched"
            );
            for draft in drafts_for(&rule, event) {
                jobs.push((draft, rule.channels.clone()));
            }
        }

        if jobs.is_empty() {
            debug!(event = event.event_type(), "No rule matched");
            return Vec::new();
        }

        let dispatcher = &self.dispatcher;
        join_all(
            jobs.into_iter()
                .map(|(draft, channels)| async move { dispatcher.dispatch(draft, &channels).await }),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelRegistry;
    use crate::mock::MockSender;
    use crate::store::{LogStore, NotificationStore, SettingsStore};
    use qarz_core::{Channel, DeliveryStatus, NotificationKind, Priority, RuleDraft};
    use qarz_db::MemoryBackend;
    use std::time::Duration;

    fn debt(amount: i64) -> BusinessEvent {
        BusinessEvent::DebtAdded {
            amount,
            customer_name: "Ahmad".into(),
            customer_id: None,
        }
    }

    #[test]
    fn test_high_debt_threshold_is_inclusive() {
        let rule = RuleCondition::HighDebt { threshold: 1_000_000 };
        assert!(matches(&rule, &debt(1_000_000)));
        assert!(!matches(&rule, &debt(999_999)));
    }

    #[test]
    fn test_condition_requires_matching_event_type() {
        let rule = RuleCondition::LargePayment { threshold: 10 };
        assert!(!matches(&rule, &debt(1_000)));
        assert!(matches(
            &rule,
            &BusinessEvent::PaymentReceived {
                amount: 10,
                customer_name: "Ahmad".into(),
                customer_id: None,
            }
        ));
    }

    #[test]
    fn test_day_based_conditions() {
        let overdue = BusinessEvent::DebtOverdue {
            amount: 5,
            customer_name: "x".into(),
            days_overdue: 30,
            customer_id: None,
        };
        assert!(matches(&RuleCondition::OverdueDebt { days: 30 }, &overdue));
        assert!(!matches(&RuleCondition::OverdueDebt { days: 31 }, &overdue));

        let inactive = BusinessEvent::CustomerInactive {
            customer_name: "x".into(),
            inactive_days: 90,
            customer_id: None,
        };
        assert!(matches(&RuleCondition::CustomerInactive { days: 60 }, &inactive));

        let expiring = BusinessEvent::SubscriptionExpiring { days_until_expiry: 7 };
        assert!(matches(&RuleCondition::SubscriptionExpiring { days: 7 }, &expiring));
        assert!(matches(&RuleCondition::SubscriptionExpiring { days: 14 }, &expiring));
        assert!(!matches(&RuleCondition::SubscriptionExpiring { days: 3 }, &expiring));
    }

    #[test]
    fn test_exact_match_conditions() {
        let staff = BusinessEvent::StaffActivity {
            staff_name: "Dilan".into(),
            action: "delete_debt".into(),
        };
        assert!(matches(
            &RuleCondition::StaffActivity {
                action: "delete_debt".into()
            },
            &staff
        ));
        assert!(!matches(
            &RuleCondition::StaffActivity {
                action: "delete".into()
            },
            &staff
        ));

        let error = BusinessEvent::SystemError {
            severity: "critical".into(),
            message: "db locked".into(),
        };
        assert!(matches(
            &RuleCondition::SystemError {
                severity: "critical".into()
            },
            &error
        ));
        assert!(!matches(
            &RuleCondition::SystemError {
                severity: "warning".into()
            },
            &error
        ));

        assert!(matches(
            &RuleCondition::BackupFailed,
            &BusinessEvent::BackupFailed { reason: String::new() }
        ));
    }

    #[test]
    fn test_rule_message_embeds_event_fields() {
        let (title, message) = rule_message(&debt(1_500_000));
        assert_eq!(title, "ئاگاداری قەرزی زۆر");
        assert!(message.contains("1,500,000"));
        assert!(message.contains("Ahmad"));

        let (_, message) = rule_message(&BusinessEvent::SystemError {
            severity: "critical".into(),
            message: "disk full".into(),
        });
        assert!(message.contains("critical"));
        assert!(message.contains("disk full"));
    }

    async fn evaluator() -> (RuleEvaluator, Arc<RuleStore>, Arc<NotificationStore>, Arc<LogStore>) {
        let backend = Arc::new(MemoryBackend::new());
        let notifications = Arc::new(NotificationStore::load(backend.clone()).await);
        let logs = Arc::new(LogStore::load(backend.clone()).await);
        let settings = Arc::new(SettingsStore::load(backend.clone()).await);
        let rules = Arc::new(RuleStore::load(backend).await);

        let mut registry = ChannelRegistry::new();
        registry.register(Arc::new(MockSender::new(Channel::Sms)));
        let dispatcher = Arc::new(Dispatcher::new(
            notifications.clone(),
            logs.clone(),
            settings,
            registry,
            Duration::from_secs(5),
        ));

        (
            RuleEvaluator::new(rules.clone(), dispatcher),
            rules,
            notifications,
            logs,
        )
    }

    fn rule(condition: RuleCondition, recipients: &[&str], channels: Vec<Channel>) -> RuleDraft {
        RuleDraft {
            name: String::new(),
            condition,
            recipients: recipients.iter().map(|r| r.to_string()).collect(),
            channels,
            priority: Priority::High,
            enabled: true,
        }
    }

    #[tokio::test]
    async fn test_end_to_end_high_debt() {
        let (evaluator, rules, notifications, logs) = evaluator().await;
        let stored = rules
            .add(rule(
                RuleCondition::HighDebt { threshold: 1_000_000 },
                &["admin-1"],
                vec![Channel::Sms, Channel::InApp],
            ))
            .await;

        let created = evaluator.evaluate(&debt(1_500_000)).await;

        assert_eq!(created.len(), 1);
        let all = notifications.list().await;
        assert_eq!(all.len(), 1);
        let n = &all[0];
        assert_eq!(n.user_id, "admin-1");
        assert_eq!(n.kind, NotificationKind::HighDebt);
        assert_eq!(n.recipient_type, Some(RecipientType::Admin));
        assert_eq!(n.priority, Priority::High);
        assert_eq!(n.related_id.as_deref(), Some(stored.id.as_str()));
        assert_eq!(n.metadata["customerName"].to_string(), "Ahmad");

        let entries = logs.for_notification(&n.id).await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].channel, Channel::Sms);
        assert_eq!(entries[1].channel, Channel::InApp);
        assert_eq!(entries[1].status, DeliveryStatus::Sent);
    }

    #[tokio::test]
    async fn test_disabled_and_non_matching_rules_are_skipped() {
        let (evaluator, rules, notifications, _) = evaluator().await;
        let disabled = rules
            .add(rule(
                RuleCondition::HighDebt { threshold: 1 },
                &["admin-1"],
                vec![Channel::InApp],
            ))
            .await;
        rules.set_enabled(&disabled.id, false).await;
        rules
            .add(rule(
                RuleCondition::HighDebt { threshold: 2_000_000 },
                &["admin-1"],
                vec![Channel::InApp],
            ))
            .await;

        assert!(evaluator.evaluate(&debt(1_500_000)).await.is_empty());
        assert!(notifications.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_overlapping_rules_are_not_deduplicated() {
        let (evaluator, rules, notifications, _) = evaluator().await;
        rules
            .add(rule(
                RuleCondition::HighDebt { threshold: 100 },
                &["admin-1", "admin-2"],
                vec![Channel::InApp],
            ))
            .await;
        rules
            .add(rule(
                RuleCondition::HighDebt { threshold: 1_000 },
                &["admin-1"],
                vec![Channel::InApp],
            ))
            .await;

        let created = evaluator.evaluate(&debt(5_000)).await;
        assert_eq!(created.len(), 3);
        assert_eq!(notifications.for_user("admin-1").await.len(), 2);
        assert_eq!(notifications.for_user("admin-2").await.len(), 1);
    }
}
