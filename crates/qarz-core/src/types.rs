//! Core types for Qarz notifications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Delivery medium for a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Sms,
    Email,
    Whatsapp,
    Viber,
    Push,
    InApp,
}

impl Channel {
    pub const ALL: [Channel; 6] = [
        Channel::Sms,
        Channel::Email,
        Channel::Whatsapp,
        Channel::Viber,
        Channel::Push,
        Channel::InApp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Sms => "sms",
            Channel::Email => "email",
            Channel::Whatsapp => "whatsapp",
            Channel::Viber => "viber",
            Channel::Push => "push",
            Channel::InApp => "in_app",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Channel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "sms" => Ok(Channel::Sms),
            "email" => Ok(Channel::Email),
            "whatsapp" => Ok(Channel::Whatsapp),
            "viber" => Ok(Channel::Viber),
            "push" => Ok(Channel::Push),
            "in_app" | "inapp" => Ok(Channel::InApp),
            _ => Err(Error::UnknownChannel(s.to_string())),
        }
    }
}

/// Notification priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(Error::UnknownPriority(s.to_string())),
        }
    }
}

/// Who a notification is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientType {
    Admin,
    Employee,
    Customer,
}

/// Notification type taxonomy, shared by notifications and templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    DebtAdded,
    PaymentReceived,
    HighDebtWarning,
    Receipt,
    #[serde(rename = "debt_50_days")]
    Debt50Days,
    #[serde(rename = "debt_100_days")]
    Debt100Days,
    DebtReminder,
    ManagerAlert,
    // Raised by manager rules
    HighDebt,
    OverdueDebt,
    LargePayment,
    CustomerInactive,
    StaffActivity,
    SystemError,
    BackupFailed,
    SubscriptionExpiring,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::DebtAdded => "debt_added",
            NotificationKind::PaymentReceived => "payment_received",
            NotificationKind::HighDebtWarning => "high_debt_warning",
            NotificationKind::Receipt => "receipt",
            NotificationKind::Debt50Days => "debt_50_days",
            NotificationKind::Debt100Days => "debt_100_days",
            NotificationKind::DebtReminder => "debt_reminder",
            NotificationKind::ManagerAlert => "manager_alert",
            NotificationKind::HighDebt => "high_debt",
            NotificationKind::OverdueDebt => "overdue_debt",
            NotificationKind::LargePayment => "large_payment",
            NotificationKind::CustomerInactive => "customer_inactive",
            NotificationKind::StaffActivity => "staff_activity",
            NotificationKind::SystemError => "system_error",
            NotificationKind::BackupFailed => "backup_failed",
            NotificationKind::SubscriptionExpiring => "subscription_expiring",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Closed value type for metadata bags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Flag(b) => write!(f, "{}", b),
            MetaValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            MetaValue::Number(n) => write!(f, "{}", n),
            MetaValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        MetaValue::Text(s.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(s: String) -> Self {
        MetaValue::Text(s)
    }
}

impl From<i64> for MetaValue {
    fn from(n: i64) -> Self {
        MetaValue::Number(n as f64)
    }
}

impl From<u32> for MetaValue {
    fn from(n: u32) -> Self {
        MetaValue::Number(n as f64)
    }
}

impl From<bool> for MetaValue {
    fn from(b: bool) -> Self {
        MetaValue::Flag(b)
    }
}

/// Open key/value context attached to notifications and logs
pub type Metadata = BTreeMap<String, MetaValue>;

/// Format a whole-dinar amount with comma thousands separators
pub fn format_amount(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Contact points used to resolve channel destinations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contacts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp_number: Option<String>,
}

impl Contacts {
    /// Resolve the destination address for a channel.
    ///
    /// Push and in-app deliveries are addressed to the user id itself.
    pub fn destination_for(&self, channel: Channel, user_id: &str) -> Option<String> {
        match channel {
            Channel::Sms | Channel::Viber => non_empty(&self.phone_number),
            Channel::Whatsapp => {
                non_empty(&self.whatsapp_number).or_else(|| non_empty(&self.phone_number))
            }
            Channel::Email => non_empty(&self.email),
            Channel::Push | Channel::InApp => {
                Some(user_id.to_string()).filter(|u| !u.is_empty())
            }
        }
    }

    /// Whether a destination is known for the channel
    pub fn has_destination(&self, channel: Channel) -> bool {
        match channel {
            Channel::Push | Channel::InApp => true,
            _ => self.destination_for(channel, "").is_some(),
        }
    }
}

/// A notification before it is persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDraft {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_type: Option<RecipientType>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_id: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
    /// Overrides the recipient's stored contact points when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contacts: Option<Contacts>,
}

impl NotificationDraft {
    pub fn new(
        kind: NotificationKind,
        user_id: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            user_id: user_id.into(),
            customer_id: None,
            recipient_id: None,
            recipient_type: None,
            priority: Priority::default(),
            related_id: None,
            metadata: Metadata::new(),
            contacts: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_customer(mut self, customer_id: Option<String>) -> Self {
        self.customer_id = customer_id;
        self
    }

    pub fn with_recipient(mut self, recipient_id: impl Into<String>, kind: RecipientType) -> Self {
        self.recipient_id = Some(recipient_id.into());
        self.recipient_type = Some(kind);
        self
    }

    pub fn with_related(mut self, related_id: impl Into<String>) -> Self {
        self.related_id = Some(related_id.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_contacts(mut self, contacts: Contacts) -> Self {
        self.contacts = Some(contacts);
        self
    }
}

/// A persisted notification record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_type: Option<RecipientType>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub channels: Vec<Channel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_id: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Materialize a draft with a fresh id and creation time
    pub fn from_draft(draft: NotificationDraft, channels: &[Channel]) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind: draft.kind,
            title: draft.title,
            message: draft.message,
            user_id: draft.user_id,
            customer_id: draft.customer_id,
            recipient_id: draft.recipient_id,
            recipient_type: draft.recipient_type,
            is_read: false,
            priority: draft.priority,
            channels: channels.to_vec(),
            related_id: draft.related_id,
            metadata: draft.metadata,
            created_at: Utc::now(),
        }
    }
}

/// Outcome of one channel send attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Sent,
    Delivered,
    Failed,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Sent => "sent",
            DeliveryStatus::Delivered => "delivered",
            DeliveryStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Append-only record of one (notification, channel) send attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationLog {
    pub id: String,
    pub notification_id: String,
    pub channel: Channel,
    pub status: DeliveryStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl NotificationLog {
    pub fn new(notification_id: impl Into<String>, channel: Channel, status: DeliveryStatus) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            notification_id: notification_id.into(),
            channel,
            status,
            timestamp: Utc::now(),
            error_message: None,
            metadata: None,
        }
    }

    pub fn failed(notification_id: impl Into<String>, channel: Channel, error: impl Into<String>) -> Self {
        let mut log = Self::new(notification_id, channel, DeliveryStatus::Failed);
        log.error_message = Some(error.into());
        log
    }

    /// Attach the provider's message id
    pub fn with_message_id(mut self, message_id: Option<String>) -> Self {
        if let Some(id) = message_id {
            self.metadata
                .get_or_insert_with(Metadata::new)
                .insert("messageId".to_string(), MetaValue::Text(id));
        }
        self
    }
}

/// Parameterized message pattern for one notification type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationTemplate {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title_template: String,
    pub message_template: String,
    #[serde(default)]
    pub channels: Vec<Channel>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Declared placeholder names, not enforced at render time
    #[serde(default)]
    pub variables: Vec<String>,
}

fn default_true() -> bool {
    true
}
