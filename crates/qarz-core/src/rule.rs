//! Manager-defined notification rules

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Channel, NotificationKind, Priority};

/// Condition a business event must satisfy for a rule to fire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleCondition {
    HighDebt { threshold: i64 },
    OverdueDebt { days: u32 },
    LargePayment { threshold: i64 },
    CustomerInactive { days: u32 },
    StaffActivity { action: String },
    SystemError { severity: String },
    BackupFailed,
    SubscriptionExpiring { days: u32 },
}

impl RuleCondition {
    /// Notification type produced when this condition fires
    pub fn notification_kind(&self) -> NotificationKind {
        match self {
            RuleCondition::HighDebt { .. } => NotificationKind::HighDebt,
            RuleCondition::OverdueDebt { .. } => NotificationKind::OverdueDebt,
            RuleCondition::LargePayment { .. } => NotificationKind::LargePayment,
            RuleCondition::CustomerInactive { .. } => NotificationKind::CustomerInactive,
            RuleCondition::StaffActivity { .. } => NotificationKind::StaffActivity,
            RuleCondition::SystemError { .. } => NotificationKind::SystemError,
            RuleCondition::BackupFailed => NotificationKind::BackupFailed,
            RuleCondition::SubscriptionExpiring { .. } => NotificationKind::SubscriptionExpiring,
        }
    }

    /// Short human-readable summary
    pub fn describe(&self) -> String {
        match self {
            RuleCondition::HighDebt { threshold } => format!("debt >= {}", threshold),
            RuleCondition::OverdueDebt { days } => format!("overdue >= {} days", days),
            RuleCondition::LargePayment { threshold } => format!("payment >= {}", threshold),
            RuleCondition::CustomerInactive { days } => format!("inactive >= {} days", days),
            RuleCondition::StaffActivity { action } => format!("staff action = {}", action),
            RuleCondition::SystemError { severity } => format!("system error = {}", severity),
            RuleCondition::BackupFailed => "backup failed".to_string(),
            RuleCondition::SubscriptionExpiring { days } => format!("expires <= {} days", days),
        }
    }
}

/// A manager-defined alerting rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerNotificationRule {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub enabled: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub channels: Vec<Channel>,
    #[serde(default)]
    pub recipients: Vec<String>,
    pub condition: RuleCondition,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ManagerNotificationRule {
    pub fn from_draft(draft: RuleDraft) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: draft.name,
            enabled: draft.enabled,
            priority: draft.priority,
            channels: draft.channels,
            recipients: draft.recipients,
            condition: draft.condition,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an edit and bump `updated_at`
    pub fn apply(&mut self, patch: RulePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(channels) = patch.channels {
            self.channels = channels;
        }
        if let Some(recipients) = patch.recipients {
            self.recipients = recipients;
        }
        if let Some(condition) = patch.condition {
            self.condition = condition;
        }
        self.updated_at = Utc::now();
    }
}

/// Fields for creating a rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDraft {
    #[serde(default)]
    pub name: String,
    pub condition: RuleCondition,
    pub recipients: Vec<String>,
    pub channels: Vec<Channel>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Partial rule edit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RulePatch {
    pub name: Option<String>,
    pub enabled: Option<bool>,
    pub priority: Option<Priority>,
    pub channels: Option<Vec<Channel>>,
    pub recipients: Option<Vec<String>>,
    pub condition: Option<RuleCondition>,
}
