//! Business event types consumed by the notification engine

use serde::{Deserialize, Serialize};

use crate::types::{MetaValue, Metadata};

/// Events raised by the ledger that may trigger notifications.
///
/// Serialized as `{"type": "...", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum BusinessEvent {
    /// A debt was recorded against a customer
    #[serde(rename_all = "camelCase")]
    DebtAdded {
        amount: i64,
        customer_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        customer_id: Option<String>,
    },

    /// A debt passed its due date
    #[serde(rename_all = "camelCase")]
    DebtOverdue {
        amount: i64,
        customer_name: String,
        days_overdue: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        customer_id: Option<String>,
    },

    /// A customer paid
    #[serde(rename_all = "camelCase")]
    PaymentReceived {
        amount: i64,
        customer_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        customer_id: Option<String>,
    },

    /// A customer had no activity for a while
    #[serde(rename_all = "camelCase")]
    CustomerInactive {
        customer_name: String,
        inactive_days: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        customer_id: Option<String>,
    },

    /// An employee performed an audited action
    #[serde(rename_all = "camelCase")]
    StaffActivity { staff_name: String, action: String },

    /// A system health check reported an error
    #[serde(rename_all = "camelCase")]
    SystemError { severity: String, message: String },

    /// A scheduled backup did not complete
    #[serde(rename_all = "camelCase")]
    BackupFailed {
        #[serde(default)]
        reason: String,
    },

    /// The shop's subscription is about to lapse
    #[serde(rename_all = "camelCase")]
    SubscriptionExpiring { days_until_expiry: u32 },
}

impl BusinessEvent {
    /// Get the event type as a string
    pub fn event_type(&self) -> &'static str {
        match self {
            BusinessEvent::DebtAdded { .. } => "debt_added",
            BusinessEvent::DebtOverdue { .. } => "debt_overdue",
            BusinessEvent::PaymentReceived { .. } => "payment_received",
            BusinessEvent::CustomerInactive { .. } => "customer_inactive",
            BusinessEvent::StaffActivity { .. } => "staff_activity",
            BusinessEvent::SystemError { .. } => "system_error",
            BusinessEvent::BackupFailed { .. } => "backup_failed",
            BusinessEvent::SubscriptionExpiring { .. } => "subscription_expiring",
        }
    }

    /// Customer the event concerns, if any
    pub fn customer_id(&self) -> Option<&str> {
        match self {
            BusinessEvent::DebtAdded { customer_id, .. }
            | BusinessEvent::DebtOverdue { customer_id, .. }
            | BusinessEvent::PaymentReceived { customer_id, .. }
            | BusinessEvent::CustomerInactive { customer_id, .. } => customer_id.as_deref(),
            _ => None,
        }
    }

    /// Event payload as a metadata bag with camelCase keys
    pub fn metadata(&self) -> Metadata {
        let mut meta = Metadata::new();
        let mut put = |key: &str, value: MetaValue| {
            meta.insert(key.to_string(), value);
        };

        match self {
            BusinessEvent::DebtAdded {
                amount,
                customer_name,
                customer_id,
            }
            | BusinessEvent::PaymentReceived {
                amount,
                customer_name,
                customer_id,
            } => {
                put("amount", (*amount).into());
                put("customerName", customer_name.as_str().into());
                if let Some(id) = customer_id {
                    put("customerId", id.as_str().into());
                }
            }
            BusinessEvent::DebtOverdue {
                amount,
                customer_name,
                days_overdue,
                customer_id,
            } => {
                put("amount", (*amount).into());
                put("customerName", customer_name.as_str().into());
                put("daysOverdue", (*days_overdue).into());
                if let Some(id) = customer_id {
                    put("customerId", id.as_str().into());
                }
            }
            BusinessEvent::CustomerInactive {
                customer_name,
                inactive_days,
                customer_id,
            } => {
                put("customerName", customer_name.as_str().into());
                put("inactiveDays", (*inactive_days).into());
                if let Some(id) = customer_id {
                    put("customerId", id.as_str().into());
                }
            }
            BusinessEvent::StaffActivity { staff_name, action } => {
                put("staffName", staff_name.as_str().into());
                put("action", action.as_str().into());
            }
            BusinessEvent::SystemError { severity, message } => {
                put("severity", severity.as_str().into());
                put("message", message.as_str().into());
            }
            BusinessEvent::BackupFailed { reason } => {
                put("reason", reason.as_str().into());
            }
            BusinessEvent::SubscriptionExpiring { days_until_expiry } => {
                put("daysUntilExpiry", (*days_until_expiry).into());
            }
        }

        meta
    }
}
