//! Settings command - per-user channel and feature toggles

use anyhow::Result;
use qarz_core::NotificationSettingsPatch;
use std::path::Path;

use crate::cli::{SettingsArgs, SettingsCommand, SettingsSetArgs};
use crate::output::{is_json_mode, print_settings, print_success};

pub async fn execute(config: Option<&Path>, args: SettingsArgs) -> Result<()> {
    let engine = super::open_engine(config).await?;

    match args.command {
        SettingsCommand::Show { user } => {
            let settings = engine.settings().get(&user).await;
            print_settings(&user, &settings);
        }
        SettingsCommand::Set(args) => {
            let user = args.user.clone();
            let settings = engine.settings().update(&user, patch_from(args)).await;
            if !is_json_mode() {
                print_success(&format!("Settings updated for {}", user));
            }
            print_settings(&user, &settings);
        }
    }

    engine.close().await;
    Ok(())
}

fn patch_from(args: SettingsSetArgs) -> NotificationSettingsPatch {
    NotificationSettingsPatch {
        sms_enabled: args.sms,
        email_enabled: args.email,
        whatsapp_enabled: args.whatsapp,
        viber_enabled: args.viber,
        push_enabled: args.push,
        in_app_enabled: args.in_app,
        phone_number: args.phone,
        email: args.email_address,
        whatsapp_number: args.whatsapp_number,
        auto_notify_on_debt: args.auto_notify_debt,
        auto_notify_on_payment: args.auto_notify_payment,
        enable_debt_notifications: args.debt_notifications,
        enable_payment_notifications: args.payment_notifications,
        enable_overdue_reminders: args.overdue_reminders,
        enable_high_debt_warnings: args.high_debt_warnings,
        high_debt_threshold: args.high_debt_threshold,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_only_given_flags_are_patched() {
        let cli = Cli::try_parse_from([
            "qarz", "settings", "set", "u1", "--sms", "true", "--phone", "0750",
        ])
        .unwrap();
        let Commands::Settings(SettingsArgs {
            command: SettingsCommand::Set(args),
        }) = cli.command
        else {
            panic!("expected settings set");
        };

        let patch = patch_from(args);
        assert_eq!(patch.sms_enabled, Some(true));
        assert_eq!(patch.phone_number.as_deref(), Some("0750"));
        assert_eq!(patch.email_enabled, None);
        assert_eq!(patch.high_debt_threshold, None);
    }
}
