//! Scheduled command - delayed notifications

use anyhow::{bail, Result};
use chrono::{Duration, Utc};
use qarz_core::{Channel, NotificationDraft, NotificationKind};
use std::path::Path;

use crate::cli::{ScheduledArgs, ScheduledCommand};
use crate::output::{
    is_json_mode, print_error, print_info, print_notifications, print_scheduled,
    print_success_json,
};

/// Ten years
const MAX_DELAY_SECS: u64 = 10 * 365 * 86400;

pub async fn execute(config: Option<&Path>, args: ScheduledArgs) -> Result<()> {
    let engine = super::open_engine(config).await?;
    let scheduled = engine.scheduled();

    let result = match args.command {
        ScheduledCommand::List => {
            print_scheduled(&scheduled.list().await);
            Ok(())
        }
        ScheduledCommand::Add {
            user,
            title,
            message,
            delay,
            channels,
            priority,
        } => {
            let channels = if channels.is_empty() {
                vec![Channel::InApp]
            } else {
                channels
            };
            let at = Utc::now() + Duration::seconds(delay.min(MAX_DELAY_SECS) as i64);
            let draft = NotificationDraft::new(NotificationKind::DebtReminder, user, title, message)
                .with_priority(priority);

            let entry = engine.schedule(draft, channels, at).await;
            print_success_json(
                &format!("Scheduled {} for {}", entry.id, entry.scheduled_for.to_rfc3339()),
                Some(&entry),
            );
            Ok(())
        }
        ScheduledCommand::Cancel { id } => {
            let all = scheduled.list().await;
            match super::resolve_id(all.iter().map(|s| s.id.as_str()), &id) {
                Some(id) => {
                    engine.cancel(&id).await;
                    print_success_json("Scheduled notification cancelled", Some(id));
                    Ok(())
                }
                None => {
                    print_error(&format!("Scheduled notification not found: {}", id));
                    bail!("Scheduled notification not found: {}", id)
                }
            }
        }
        ScheduledCommand::Process => {
            let sent = engine.process_due(Utc::now()).await;
            if sent.is_empty() && !is_json_mode() {
                print_info("Nothing due");
            } else {
                print_notifications(&sent);
            }
            Ok(())
        }
    };

    engine.close().await;
    result
}
