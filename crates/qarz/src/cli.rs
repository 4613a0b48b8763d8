//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use qarz_core::{Channel, Priority};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "qarz")]
#[command(version, about = "Notification engine for the Qarz debt ledger")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output in JSON format instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (default: ~/.qarz/config.toml)
    #[arg(long, global = true, env = "QARZ_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a business event (JSON) through the manager rules
    Emit {
        /// Event as JSON, e.g. '{"type":"backup_failed","data":{"reason":"disk"}}'
        event: String,
    },

    /// Send an event-specific notification
    Send(SendArgs),

    /// Inspect and manage stored notifications
    Notifications(NotificationsArgs),

    /// Show delivery logs
    Logs {
        /// Only logs for this notification
        #[arg(long)]
        notification: Option<String>,
    },

    /// Manage manager notification rules
    Rules(RulesArgs),

    /// Show or change per-user notification settings
    Settings(SettingsArgs),

    /// Manage notification templates
    Templates(TemplatesArgs),

    /// Manage scheduled notifications
    Scheduled(ScheduledArgs),

    /// Configure HTTP gateways for external channels
    Gateway(GatewayArgs),
}

#[derive(Args)]
pub struct SendArgs {
    #[command(subcommand)]
    pub command: SendCommand,
}

#[derive(Subcommand)]
pub enum SendCommand {
    /// A debt was recorded
    Debt {
        #[arg(long)]
        user: String,
        #[arg(long)]
        customer: String,
        #[arg(long)]
        customer_id: Option<String>,
        #[arg(long)]
        amount: i64,
        /// Customer's total debt after this one
        #[arg(long)]
        total: i64,
    },

    /// A payment was received
    Payment {
        #[arg(long)]
        user: String,
        #[arg(long)]
        customer: String,
        #[arg(long)]
        customer_id: Option<String>,
        #[arg(long)]
        amount: i64,
        #[arg(long)]
        remaining: i64,
    },

    /// A receipt was generated
    Receipt {
        #[arg(long)]
        user: String,
        /// Receipt number
        #[arg(long)]
        number: String,
        #[arg(long)]
        customer: String,
        #[arg(long)]
        amount: i64,
    },

    /// Warn if a customer's total debt reached the user's threshold
    HighDebt {
        #[arg(long)]
        user: String,
        #[arg(long)]
        customer: String,
        #[arg(long)]
        customer_id: Option<String>,
        #[arg(long)]
        total: i64,
    },

    /// Overdue or reminder alert to a customer
    CustomerAlert {
        #[arg(long)]
        user: String,
        #[arg(long, value_enum)]
        kind: AlertKindArg,
        #[arg(long)]
        customer: String,
        #[arg(long)]
        customer_id: Option<String>,
        #[arg(long)]
        amount: i64,
        /// Customer phone (SMS / Viber / WhatsApp fallback)
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        whatsapp: Option<String>,
    },

    /// Free-form alert to a manager
    Manager {
        #[arg(long)]
        manager: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        message: String,
        #[arg(long, default_value = "medium", value_parser = parse_priority)]
        priority: Priority,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum AlertKindArg {
    #[value(name = "50-days")]
    Days50,
    #[value(name = "100-days")]
    Days100,
    Reminder,
}

#[derive(Args)]
pub struct NotificationsArgs {
    #[command(subcommand)]
    pub command: NotificationsCommand,
}

#[derive(Subcommand)]
pub enum NotificationsCommand {
    /// List notifications, newest first
    List {
        #[arg(long)]
        user: Option<String>,
        /// Only unread notifications
        #[arg(long)]
        unread: bool,
    },

    /// Mark one notification as read
    Read { id: String },

    /// Mark all notifications as read
    ReadAll {
        #[arg(long)]
        user: Option<String>,
    },

    /// Delete one notification
    Remove { id: String },

    /// Delete every notification
    Clear,
}

#[derive(Args)]
pub struct RulesArgs {
    #[command(subcommand)]
    pub command: RulesCommand,
}

#[derive(Subcommand)]
pub enum RulesCommand {
    /// List rules
    List,

    /// Create a rule
    Add {
        /// Rule name
        #[arg(long, default_value = "")]
        name: String,
        /// Condition as JSON, e.g. '{"type":"high_debt","threshold":1000000}'
        #[arg(long)]
        condition: String,
        /// Recipient user id (repeatable)
        #[arg(long = "recipient", required = true)]
        recipients: Vec<String>,
        /// Channel (repeatable)
        #[arg(long = "channel", required = true, value_parser = parse_channel)]
        channels: Vec<Channel>,
        #[arg(long, default_value = "medium", value_parser = parse_priority)]
        priority: Priority,
        /// Create the rule disabled
        #[arg(long)]
        disabled: bool,
    },

    /// Enable a rule
    Enable { id: String },

    /// Disable a rule
    Disable { id: String },

    /// Delete a rule
    Remove { id: String },
}

#[derive(Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommand,
}

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Show a user's settings
    Show { user: String },

    /// Merge changes into a user's settings
    Set(SettingsSetArgs),
}

#[derive(Args)]
pub struct SettingsSetArgs {
    pub user: String,

    #[arg(long)]
    pub sms: Option<bool>,
    #[arg(long)]
    pub email: Option<bool>,
    #[arg(long)]
    pub whatsapp: Option<bool>,
    #[arg(long)]
    pub viber: Option<bool>,
    #[arg(long)]
    pub push: Option<bool>,
    #[arg(long)]
    pub in_app: Option<bool>,

    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub email_address: Option<String>,
    #[arg(long)]
    pub whatsapp_number: Option<String>,

    #[arg(long)]
    pub debt_notifications: Option<bool>,
    #[arg(long)]
    pub payment_notifications: Option<bool>,
    #[arg(long)]
    pub overdue_reminders: Option<bool>,
    #[arg(long)]
    pub high_debt_warnings: Option<bool>,
    #[arg(long)]
    pub high_debt_threshold: Option<i64>,
    #[arg(long)]
    pub auto_notify_debt: Option<bool>,
    #[arg(long)]
    pub auto_notify_payment: Option<bool>,
}

#[derive(Args)]
pub struct TemplatesArgs {
    #[command(subcommand)]
    pub command: TemplatesCommand,
}

#[derive(Subcommand)]
pub enum TemplatesCommand {
    /// List templates
    List,

    /// Activate a template
    Enable { id: String },

    /// Deactivate a template
    Disable { id: String },
}

#[derive(Args)]
pub struct ScheduledArgs {
    #[command(subcommand)]
    pub command: ScheduledCommand,
}

#[derive(Subcommand)]
pub enum ScheduledCommand {
    /// List pending scheduled notifications
    List,

    /// Schedule a reminder notification
    Add {
        #[arg(long)]
        user: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        message: String,
        /// Delay before sending (e.g. "30m", "2h", "1d")
        #[arg(long = "in", value_parser = parse_duration)]
        delay: u64,
        /// Channel (repeatable, default: in_app)
        #[arg(long = "channel", value_parser = parse_channel)]
        channels: Vec<Channel>,
        #[arg(long, default_value = "medium", value_parser = parse_priority)]
        priority: Priority,
    },

    /// Cancel a scheduled notification
    Cancel { id: String },

    /// Dispatch every due notification now
    Process,
}

#[derive(Args)]
pub struct GatewayArgs {
    #[command(subcommand)]
    pub command: GatewayCommand,
}

#[derive(Subcommand)]
pub enum GatewayCommand {
    /// Point a channel at an HTTP gateway
    Set {
        #[arg(value_parser = parse_channel)]
        channel: Channel,
        #[arg(long)]
        url: String,
        /// Bearer token sent with every request
        #[arg(long)]
        token: Option<String>,
    },

    /// Remove a channel's gateway
    Remove {
        #[arg(value_parser = parse_channel)]
        channel: Channel,
    },

    /// Show configured gateways
    Status,
}

fn parse_channel(s: &str) -> Result<Channel, String> {
    s.parse().map_err(|e: qarz_core::Error| e.to_string())
}

fn parse_priority(s: &str) -> Result<Priority, String> {
    s.parse().map_err(|e: qarz_core::Error| e.to_string())
}

/// Parse duration strings like "1h", "30m", "2d", "24h30m" into seconds
fn parse_duration(s: &str) -> Result<u64, String> {
    let s = s.trim().to_lowercase();
    if s.is_empty() {
        return Err("Empty duration string".to_string());
    }

    let mut total_secs: u64 = 0;
    let mut current_num = String::new();

    for c in s.chars() {
        if c.is_ascii_digit() {
            current_num.push(c);
        } else {
            if current_num.is_empty() {
                return Err(format!("Invalid duration format: {}", s));
            }
            let num: u64 = current_num
                .parse()
                .map_err(|_| format!("Invalid number in duration: {}", current_num))?;
            current_num.clear();

            let multiplier = match c {
                's' => 1,
                'm' => 60,
                'h' => 3600,
                'd' => 86400,
                _ => return Err(format!("Unknown duration unit: {}", c)),
            };
            total_secs = num
                .checked_mul(multiplier)
                .and_then(|v| total_secs.checked_add(v))
                .ok_or_else(|| "Duration too large".to_string())?;
        }
    }

    // Plain numbers are seconds
    if !current_num.is_empty() {
        let num: u64 = current_num
            .parse()
            .map_err(|_| format!("Invalid number in duration: {}", current_num))?;
        total_secs = total_secs
            .checked_add(num)
            .ok_or_else(|| "Duration too large".to_string())?;
    }

    Ok(total_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("0").unwrap(), 0);
        assert_eq!(parse_duration("30m").unwrap(), 1800);
        assert_eq!(parse_duration("1H").unwrap(), 3600);
        assert_eq!(parse_duration("1d12h").unwrap(), 129600);
        assert_eq!(parse_duration("90").unwrap(), 90);
    }

    #[test]
    fn test_parse_duration_errors() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("abc").is_err());
        assert!(parse_duration("1x").is_err());
    }

    #[test]
    fn test_parse_duration_overflow() {
        assert_eq!(
            parse_duration("999999999999999d").unwrap_err(),
            "Duration too large"
        );
        assert_eq!(
            parse_duration("18446744073709551615s1s").unwrap_err(),
            "Duration too large"
        );
        assert!(parse_duration("3650d").is_ok());
    }

    #[test]
    fn test_parse_channel_and_priority() {
        assert_eq!(parse_channel("in_app").unwrap(), Channel::InApp);
        assert!(parse_channel("telegram").is_err());
        assert_eq!(parse_priority("high").unwrap(), Priority::High);
        assert!(parse_priority("urgent").is_err());
    }

    #[test]
    fn test_rules_add_args() {
        let cli = Cli::try_parse_from([
            "qarz",
            "rules",
            "add",
            "--condition",
            r#"{"type":"backup_failed"}"#,
            "--recipient",
            "admin-1",
            "--recipient",
            "admin-2",
            "--channel",
            "in_app",
        ])
        .unwrap();
        match cli.command {
            Commands::Rules(RulesArgs {
                command: RulesCommand::Add {
                    recipients,
                    channels,
                    priority,
                    ..
                },
            }) => {
                assert_eq!(recipients, vec!["admin-1", "admin-2"]);
                assert_eq!(channels, vec![Channel::InApp]);
                assert_eq!(priority, Priority::Medium);
            }
            _ => panic!("expected rules add"),
        }
    }
}
