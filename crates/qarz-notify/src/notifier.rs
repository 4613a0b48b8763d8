//! Event-specific notifiers
//!
//! Each notifier checks the user's settings, renders the active template for
//! its type and dispatches on the channels the user has enabled and can be
//! reached on. A disabled feature or a missing template is a silent no-op.

use qarz_core::{
    format_amount, Channel, Contacts, MetaValue, Metadata, Notification, NotificationDraft,
    NotificationKind, NotificationSettings, Priority, RecipientType,
};
use std::sync::Arc;
use tracing::debug;

use crate::dispatch::Dispatcher;
use crate::render::{render, variables, Variables};
use crate::store::{SettingsStore, TemplateStore};

/// A debt recorded against a customer
#[derive(Debug, Clone)]
pub struct DebtNotice {
    pub debt_id: Option<String>,
    pub customer_id: Option<String>,
    pub customer_name: String,
    pub amount: i64,
    pub total_debt: i64,
}

/// A payment received from a customer
#[derive(Debug, Clone)]
pub struct PaymentNotice {
    pub payment_id: Option<String>,
    pub customer_id: Option<String>,
    pub customer_name: String,
    pub amount: i64,
    pub remaining_debt: i64,
}

/// A generated payment receipt
#[derive(Debug, Clone)]
pub struct ReceiptNotice {
    pub receipt_number: String,
    pub customer_id: Option<String>,
    pub customer_name: String,
    pub amount: i64,
}

/// Which reminder a customer receives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerAlertKind {
    Debt50Days,
    Debt100Days,
    Reminder,
}

/// An overdue or reminder alert addressed to a customer
#[derive(Debug, Clone)]
pub struct CustomerAlert {
    pub kind: CustomerAlertKind,
    pub customer_id: Option<String>,
    pub customer_name: String,
    pub amount: i64,
    /// The customer's own contact points
    pub contacts: Contacts,
}

impl CustomerAlert {
    /// Fixed wording per alert kind; these alerts bypass the template store
    fn content(&self) -> (NotificationKind, Priority, String, String) {
        let amount = format_amount(self.amount);
        match self.kind {
            CustomerAlertKind::Debt50Days => (
                NotificationKind::Debt50Days,
                Priority::High,
                "ئاگاداری قەرز - ٥٠ ڕۆژ".to_string(),
                format!(
                    "بەڕێز {}، قەرزەکەت بە بڕی {} دینار ٥٠ ڕۆژی تێپەڕاندووە. تکایە سەردانمان بکە بۆ پارەدان.",
                    self.customer_name, amount
                ),
            ),
            CustomerAlertKind::Debt100Days => (
                NotificationKind::Debt100Days,
                Priority::High,
                "ئاگاداری گرنگ - ١٠٠ ڕۆژ".to_string(),
                format!(
                    "بەڕێز {}، قەرزەکەت بە بڕی {} دینار ١٠٠ ڕۆژی تێپەڕاندووە. تکایە بە زووترین کات پارەکە بدە.",
                    self.customer_name, amount
                ),
            ),
            CustomerAlertKind::Reminder => (
                NotificationKind::DebtReminder,
                Priority::Medium,
                "بیرخستنەوەی قەرز".to_string(),
                format!(
                    "بەڕێز {}، بیرت دەخەینەوە کە قەرزی {} دینارت لەسەرە.",
                    self.customer_name, amount
                ),
            ),
        }
    }
}

fn metadata_from(vars: &Variables) -> Metadata {
    vars.iter()
        .map(|(k, v)| (k.clone(), MetaValue::Text(v.clone())))
        .collect()
}

/// Channels enabled in settings that can reach the given contacts
fn channels_for(settings: &NotificationSettings, contacts: &Contacts) -> Vec<Channel> {
    Channel::ALL
        .into_iter()
        .filter(|c| settings.channel_enabled(*c) && contacts.has_destination(*c))
        .collect()
}

/// Template-driven parameters shared by most notifiers
struct Templated {
    kind: NotificationKind,
    priority: Priority,
    vars: Variables,
    customer_id: Option<String>,
    related_id: Option<String>,
}

pub struct Notifiers {
    dispatcher: Arc<Dispatcher>,
    templates: Arc<TemplateStore>,
    settings: Arc<SettingsStore>,
}

impl Notifiers {
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        templates: Arc<TemplateStore>,
        settings: Arc<SettingsStore>,
    ) -> Self {
        Self {
            dispatcher,
            templates,
            settings,
        }
    }

    pub async fn send_debt_notification(
        &self,
        user_id: &str,
        debt: &DebtNotice,
    ) -> Option<Notification> {
        let settings = self.settings.get(user_id).await;
        if !(settings.auto_notify_on_debt && settings.enable_debt_notifications) {
            debug!(user_id, "Debt notifications disabled");
            return None;
        }

        let vars = variables([
            ("customerName", debt.customer_name.clone()),
            ("amount", format_amount(debt.amount)),
            ("totalDebt", format_amount(debt.total_debt)),
        ]);
        self.send_templated(
            user_id,
            &settings,
            Templated {
                kind: NotificationKind::DebtAdded,
                priority: Priority::Medium,
                vars,
                customer_id: debt.customer_id.clone(),
                related_id: debt.debt_id.clone(),
            },
        )
        .await
    }

    pub async fn send_payment_notification(
        &self,
        user_id: &str,
        payment: &PaymentNotice,
    ) -> Option<Notification> {
        let settings = self.settings.get(user_id).await;
        if !(settings.auto_notify_on_payment && settings.enable_payment_notifications) {
            debug!(user_id, "Payment notifications disabled");
            return None;
        }

        let vars = variables([
            ("customerName", payment.customer_name.clone()),
            ("amount", format_amount(payment.amount)),
            ("remainingDebt", format_amount(payment.remaining_debt)),
        ]);
        self.send_templated(
            user_id,
            &settings,
            Templated {
                kind: NotificationKind::PaymentReceived,
                priority: Priority::Low,
                vars,
                customer_id: payment.customer_id.clone(),
                related_id: payment.payment_id.clone(),
            },
        )
        .await
    }

    /// Warn when a customer's total debt reaches the user's threshold
    pub async fn send_high_debt_warning(
        &self,
        user_id: &str,
        customer_id: Option<&str>,
        customer_name: &str,
        total_debt: i64,
    ) -> Option<Notification> {
        let settings = self.settings.get(user_id).await;
        if !settings.enable_high_debt_warnings {
            debug!(user_id, "High debt warnings disabled");
            return None;
        }
        if total_debt < settings.high_debt_threshold {
            return None;
        }

        let vars = variables([
            ("customerName", customer_name.to_string()),
            ("totalDebt", format_amount(total_debt)),
            ("threshold", format_amount(settings.high_debt_threshold)),
        ]);
        self.send_templated(
            user_id,
            &settings,
            Templated {
                kind: NotificationKind::HighDebtWarning,
                priority: Priority::High,
                vars,
                customer_id: customer_id.map(str::to_string),
                related_id: None,
            },
        )
        .await
    }

    pub async fn send_receipt_notification(
        &self,
        user_id: &str,
        receipt: &ReceiptNotice,
    ) -> Option<Notification> {
        let settings = self.settings.get(user_id).await;
        if !settings.enable_payment_notifications {
            debug!(user_id, "Receipt notifications disabled");
            return None;
        }

        let vars = variables([
            ("receiptNumber", receipt.receipt_number.clone()),
            ("customerName", receipt.customer_name.clone()),
            ("amount", format_amount(receipt.amount)),
        ]);
        self.send_templated(
            user_id,
            &settings,
            Templated {
                kind: NotificationKind::Receipt,
                priority: Priority::Low,
                vars,
                customer_id: receipt.customer_id.clone(),
                related_id: Some(receipt.receipt_number.clone()),
            },
        )
        .await
    }

    /// Send an overdue or reminder alert to a customer on behalf of `user_id`
    pub async fn send_customer_alert(
        &self,
        user_id: &str,
        alert: &CustomerAlert,
    ) -> Option<Notification> {
        let settings = self.settings.get(user_id).await;
        if !settings.enable_overdue_reminders {
            debug!(user_id, "Overdue reminders disabled");
            return None;
        }

        let (kind, priority, title, message) = alert.content();
        let channels = channels_for(&settings, &alert.contacts);

        let mut metadata = Metadata::new();
        metadata.insert("customerName".into(), alert.customer_name.as_str().into());
        metadata.insert("amount".into(), alert.amount.into());

        let mut draft = NotificationDraft::new(kind, user_id, title, message)
            .with_priority(priority)
            .with_customer(alert.customer_id.clone())
            .with_metadata(metadata)
            .with_contacts(alert.contacts.clone());
        if let Some(customer_id) = &alert.customer_id {
            draft = draft.with_recipient(customer_id.clone(), RecipientType::Customer);
        }

        Some(self.dispatcher.dispatch(draft, &channels).await)
    }

    /// Free-form alert to a manager, rendered through the manager alert template
    pub async fn send_manager_alert(
        &self,
        manager_id: &str,
        title: &str,
        message: &str,
        priority: Priority,
    ) -> Option<Notification> {
        let settings = self.settings.get(manager_id).await;
        let vars = variables([
            ("title", title.to_string()),
            ("message", message.to_string()),
        ]);
        self.send_templated(
            manager_id,
            &settings,
            Templated {
                kind: NotificationKind::ManagerAlert,
                priority,
                vars,
                customer_id: None,
                related_id: None,
            },
        )
        .await
    }

    async fn send_templated(
        &self,
        user_id: &str,
        settings: &NotificationSettings,
        params: Templated,
    ) -> Option<Notification> {
        let Some(template) = self.templates.find_active(params.kind).await else {
            debug!(kind = %params.kind, "No active template");
            return None;
        };

        let rendered = render(&template, &params.vars);
        let channels = settings.deliverable_channels();

        let mut draft = NotificationDraft::new(params.kind, user_id, rendered.title, rendered.body)
            .with_priority(params.priority)
            .with_customer(params.customer_id)
            .with_metadata(metadata_from(&params.vars));
        if params.kind == NotificationKind::ManagerAlert {
            draft = draft.with_recipient(user_id, RecipientType::Admin);
        }
        if let Some(related) = params.related_id {
            draft = draft.with_related(related);
        }

        Some(self.dispatcher.dispatch(draft, &channels).await)
    }
}
