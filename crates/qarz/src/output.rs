//! Table and JSON output formatting

use colored::Colorize;
use qarz_core::{
    DeliveryStatus, ManagerNotificationRule, Notification, NotificationLog, NotificationSettings,
    NotificationTemplate, Priority,
};
use qarz_notify::store::ScheduledNotification;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

/// Global flag for JSON output mode
static JSON_MODE: AtomicBool = AtomicBool::new(false);

/// Enable or disable JSON output mode
pub fn set_json_mode(enabled: bool) {
    JSON_MODE.store(enabled, Ordering::SeqCst);
}

/// Check if JSON output mode is enabled
pub fn is_json_mode() -> bool {
    JSON_MODE.load(Ordering::SeqCst)
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing to JSON: {}", e),
    }
}

fn print_table<R: Tabled>(rows: Vec<R>) {
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::single(0)).with(Alignment::left()))
        .to_string();
    println!("{}", table);
}

/// Shorten an id to its first segment for table display
fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}

fn format_priority(priority: Priority) -> String {
    match priority {
        Priority::High => "high".red().bold().to_string(),
        Priority::Medium => "medium".yellow().to_string(),
        Priority::Low => "low".normal().to_string(),
    }
}

fn format_delivery(status: DeliveryStatus) -> String {
    match status {
        DeliveryStatus::Delivered => "delivered".green().to_string(),
        DeliveryStatus::Sent => "sent".cyan().to_string(),
        DeliveryStatus::Failed => "failed".red().to_string(),
    }
}

fn format_enabled(enabled: bool) -> String {
    if enabled {
        "on".green().to_string()
    } else {
        "off".dimmed().to_string()
    }
}

fn join_channels<T: ToString>(channels: &[T]) -> String {
    if channels.is_empty() {
        return "-".to_string();
    }
    channels
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Tabled)]
pub struct NotificationRow {
    #[tabled(rename = "id")]
    pub id: String,
    #[tabled(rename = "type")]
    pub kind: String,
    #[tabled(rename = "user")]
    pub user: String,
    #[tabled(rename = "priority")]
    pub priority: String,
    #[tabled(rename = "title")]
    pub title: String,
    #[tabled(rename = "channels")]
    pub channels: String,
    #[tabled(rename = "read")]
    pub read: String,
    #[tabled(rename = "created")]
    pub created: String,
}

impl From<&Notification> for NotificationRow {
    fn from(n: &Notification) -> Self {
        NotificationRow {
            id: short_id(&n.id),
            kind: n.kind.to_string(),
            user: n.user_id.clone(),
            priority: format_priority(n.priority),
            title: truncate(&n.title, 32),
            channels: join_channels(&n.channels),
            read: if n.is_read {
                "✓".green().to_string()
            } else {
                "•".yellow().to_string()
            },
            created: n.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

pub fn print_notifications(notifications: &[Notification]) {
    if is_json_mode() {
        print_json(notifications);
        return;
    }

    if notifications.is_empty() {
        println!("No notifications");
        return;
    }

    print_table(notifications.iter().map(NotificationRow::from).collect());
}

#[derive(Tabled)]
pub struct LogRow {
    #[tabled(rename = "notification")]
    pub notification: String,
    #[tabled(rename = "channel")]
    pub channel: String,
    #[tabled(rename = "status")]
    pub status: String,
    #[tabled(rename = "at")]
    pub at: String,
    #[tabled(rename = "error")]
    pub error: String,
}

impl From<&NotificationLog> for LogRow {
    fn from(log: &NotificationLog) -> Self {
        LogRow {
            notification: short_id(&log.notification_id),
            channel: log.channel.to_string(),
            status: format_delivery(log.status),
            at: log.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            error: log
                .error_message
                .as_deref()
                .map(|e| truncate(e, 48))
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

pub fn print_logs(logs: &[NotificationLog]) {
    if is_json_mode() {
        print_json(logs);
        return;
    }

    if logs.is_empty() {
        println!("No delivery logs");
        return;
    }

    print_table(logs.iter().map(LogRow::from).collect());
}

#[derive(Tabled)]
pub struct RuleRow {
    #[tabled(rename = "id")]
    pub id: String,
    #[tabled(rename = "name")]
    pub name: String,
    #[tabled(rename = "enabled")]
    pub enabled: String,
    #[tabled(rename = "condition")]
    pub condition: String,
    #[tabled(rename = "priority")]
    pub priority: String,
    #[tabled(rename = "recipients")]
    pub recipients: String,
    #[tabled(rename = "channels")]
    pub channels: String,
}

impl From<&ManagerNotificationRule> for RuleRow {
    fn from(rule: &ManagerNotificationRule) -> Self {
        RuleRow {
            id: short_id(&rule.id),
            name: if rule.name.is_empty() {
                "-".to_string()
            } else {
                rule.name.clone()
            },
            enabled: format_enabled(rule.enabled),
            condition: rule.condition.describe(),
            priority: format_priority(rule.priority),
            recipients: rule.recipients.join(","),
            channels: join_channels(&rule.channels),
        }
    }
}

pub fn print_rules(rules: &[ManagerNotificationRule]) {
    if is_json_mode() {
        print_json(rules);
        return;
    }

    if rules.is_empty() {
        println!("No rules defined");
        return;
    }

    print_table(rules.iter().map(RuleRow::from).collect());
}

#[derive(Tabled)]
pub struct TemplateRow {
    #[tabled(rename = "id")]
    pub id: String,
    #[tabled(rename = "type")]
    pub kind: String,
    #[tabled(rename = "active")]
    pub active: String,
    #[tabled(rename = "title")]
    pub title: String,
    #[tabled(rename = "variables")]
    pub variables: String,
}

impl From<&NotificationTemplate> for TemplateRow {
    fn from(t: &NotificationTemplate) -> Self {
        TemplateRow {
            id: t.id.clone(),
            kind: t.kind.to_string(),
            active: format_enabled(t.is_active),
            title: truncate(&t.title_template, 32),
            variables: t.variables.join(","),
        }
    }
}

pub fn print_templates(templates: &[NotificationTemplate]) {
    if is_json_mode() {
        print_json(templates);
        return;
    }

    if templates.is_empty() {
        println!("No templates");
        return;
    }

    print_table(templates.iter().map(TemplateRow::from).collect());
}

#[derive(Tabled)]
pub struct ScheduledRow {
    #[tabled(rename = "id")]
    pub id: String,
    #[tabled(rename = "user")]
    pub user: String,
    #[tabled(rename = "title")]
    pub title: String,
    #[tabled(rename = "channels")]
    pub channels: String,
    #[tabled(rename = "due")]
    pub due: String,
}

impl From<&ScheduledNotification> for ScheduledRow {
    fn from(s: &ScheduledNotification) -> Self {
        ScheduledRow {
            id: short_id(&s.id),
            user: s.draft.user_id.clone(),
            title: truncate(&s.draft.title, 32),
            channels: join_channels(&s.channels),
            due: s.scheduled_for.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

pub fn print_scheduled(entries: &[ScheduledNotification]) {
    if is_json_mode() {
        print_json(entries);
        return;
    }

    if entries.is_empty() {
        println!("Nothing scheduled");
        return;
    }

    print_table(entries.iter().map(ScheduledRow::from).collect());
}

pub fn print_settings(user: &str, settings: &NotificationSettings) {
    if is_json_mode() {
        print_json(settings);
        return;
    }

    let dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());

    println!("{}", "─".repeat(50));
    println!("  {} │ {}", "User".bold(), user);
    println!("{}", "─".repeat(50));
    println!("  {} │ {}", "In-app".bold(), format_enabled(settings.in_app_enabled));
    println!("  {} │ {}", "SMS".bold(), format_enabled(settings.sms_enabled));
    println!("  {} │ {}", "Email".bold(), format_enabled(settings.email_enabled));
    println!("  {} │ {}", "WhatsApp".bold(), format_enabled(settings.whatsapp_enabled));
    println!("  {} │ {}", "Viber".bold(), format_enabled(settings.viber_enabled));
    println!("  {} │ {}", "Push".bold(), format_enabled(settings.push_enabled));
    println!("{}", "─".repeat(50));
    println!("  {} │ {}", "Phone".bold(), dash(&settings.phone_number));
    println!("  {} │ {}", "Email address".bold(), dash(&settings.email));
    println!("  {} │ {}", "WhatsApp number".bold(), dash(&settings.whatsapp_number));
    println!("{}", "─".repeat(50));
    println!("  {} │ {}", "Debt".bold(), format_enabled(settings.enable_debt_notifications));
    println!("  {} │ {}", "Payment".bold(), format_enabled(settings.enable_payment_notifications));
    println!("  {} │ {}", "Overdue".bold(), format_enabled(settings.enable_overdue_reminders));
    println!("  {} │ {}", "High debt".bold(), format_enabled(settings.enable_high_debt_warnings));
    println!(
        "  {} │ {}",
        "Threshold".bold(),
        qarz_core::format_amount(settings.high_debt_threshold)
    );
    println!("  {} │ {}", "Auto on debt".bold(), format_enabled(settings.auto_notify_on_debt));
    println!("  {} │ {}", "Auto on payment".bold(), format_enabled(settings.auto_notify_on_payment));
    println!("{}", "─".repeat(50));
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// JSON wrapper for generic responses
#[derive(Serialize)]
pub struct ResponseJson<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Print a success message, or a JSON response carrying `data`
pub fn print_success_json<T: Serialize>(message: &str, data: Option<T>) {
    if is_json_mode() {
        print_json(&ResponseJson {
            success: true,
            message: Some(message.to_string()),
            data,
        });
    } else {
        print_success(message);
    }
}
