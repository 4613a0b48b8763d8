//! Per-user notification settings

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_HIGH_DEBT_THRESHOLD, DEFAULT_REMINDER_DAYS_BEFORE};
use crate::types::{Channel, Contacts};

/// How often overdue reminders repeat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReminderFrequency {
    Daily,
    #[default]
    Weekly,
    Monthly,
}

/// Notification settings, one record per user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettings {
    pub sms_enabled: bool,
    pub email_enabled: bool,
    pub whatsapp_enabled: bool,
    pub viber_enabled: bool,
    pub push_enabled: bool,
    pub in_app_enabled: bool,

    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub whatsapp_number: Option<String>,

    pub auto_notify_on_debt: bool,
    pub auto_notify_on_payment: bool,

    pub enable_debt_notifications: bool,
    pub enable_payment_notifications: bool,
    pub enable_overdue_reminders: bool,
    pub enable_high_debt_warnings: bool,

    pub high_debt_threshold: i64,
    pub reminder_days_before: u32,
    pub reminder_frequency: ReminderFrequency,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            sms_enabled: false,
            email_enabled: false,
            whatsapp_enabled: false,
            viber_enabled: false,
            push_enabled: false,
            in_app_enabled: true,
            phone_number: None,
            email: None,
            whatsapp_number: None,
            auto_notify_on_debt: true,
            auto_notify_on_payment: true,
            enable_debt_notifications: true,
            enable_payment_notifications: true,
            enable_overdue_reminders: true,
            enable_high_debt_warnings: true,
            high_debt_threshold: DEFAULT_HIGH_DEBT_THRESHOLD,
            reminder_days_before: DEFAULT_REMINDER_DAYS_BEFORE,
            reminder_frequency: ReminderFrequency::default(),
        }
    }
}

impl NotificationSettings {
    /// Contact points stored on this record
    pub fn contacts(&self) -> Contacts {
        Contacts {
            phone_number: self.phone_number.clone(),
            email: self.email.clone(),
            whatsapp_number: self.whatsapp_number.clone(),
        }
    }

    /// Whether the channel is switched on
    pub fn channel_enabled(&self, channel: Channel) -> bool {
        match channel {
            Channel::Sms => self.sms_enabled,
            Channel::Email => self.email_enabled,
            Channel::Whatsapp => self.whatsapp_enabled,
            Channel::Viber => self.viber_enabled,
            Channel::Push => self.push_enabled,
            Channel::InApp => self.in_app_enabled,
        }
    }

    /// Channels that are both enabled and have a known destination
    pub fn deliverable_channels(&self) -> Vec<Channel> {
        let contacts = self.contacts();
        Channel::ALL
            .into_iter()
            .filter(|c| self.channel_enabled(*c) && contacts.has_destination(*c))
            .collect()
    }

    /// Merge a partial update onto this record
    pub fn apply(&mut self, patch: NotificationSettingsPatch) {
        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = patch.$field {
                    self.$field = value;
                })*
            };
        }

        merge!(
            sms_enabled,
            email_enabled,
            whatsapp_enabled,
            viber_enabled,
            push_enabled,
            in_app_enabled,
            auto_notify_on_debt,
            auto_notify_on_payment,
            enable_debt_notifications,
            enable_payment_notifications,
            enable_overdue_reminders,
            enable_high_debt_warnings,
            high_debt_threshold,
            reminder_days_before,
            reminder_frequency,
        );

        if let Some(phone) = patch.phone_number {
            self.phone_number = Some(phone);
        }
        if let Some(email) = patch.email {
            self.email = Some(email);
        }
        if let Some(whatsapp) = patch.whatsapp_number {
            self.whatsapp_number = Some(whatsapp);
        }
    }
}

/// Partial settings update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettingsPatch {
    pub sms_enabled: Option<bool>,
    pub email_enabled: Option<bool>,
    pub whatsapp_enabled: Option<bool>,
    pub viber_enabled: Option<bool>,
    pub push_enabled: Option<bool>,
    pub in_app_enabled: Option<bool>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub whatsapp_number: Option<String>,
    pub auto_notify_on_debt: Option<bool>,
    pub auto_notify_on_payment: Option<bool>,
    pub enable_debt_notifications: Option<bool>,
    pub enable_payment_notifications: Option<bool>,
    pub enable_overdue_reminders: Option<bool>,
    pub enable_high_debt_warnings: Option<bool>,
    pub high_debt_threshold: Option<i64>,
    pub reminder_days_before: Option<u32>,
    pub reminder_frequency: Option<ReminderFrequency>,
}
