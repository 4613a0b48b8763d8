//! Notifications command - list, mark read, remove

use anyhow::{bail, Result};
use qarz_core::Error;
use qarz_notify::NotificationEngine;
use std::path::Path;

use crate::cli::{NotificationsArgs, NotificationsCommand};
use crate::output::{print_error, print_notifications, print_success_json};

pub async fn execute(config: Option<&Path>, args: NotificationsArgs) -> Result<()> {
    let engine = super::open_engine(config).await?;
    let result = run(&engine, args.command).await;
    engine.close().await;
    result
}

async fn run(engine: &NotificationEngine, command: NotificationsCommand) -> Result<()> {
    let store = engine.notifications();

    match command {
        NotificationsCommand::List { user, unread } => {
            let mut list = match &user {
                Some(user) => store.for_user(user).await,
                None => store.list().await,
            };
            if unread {
                list.retain(|n| !n.is_read);
            }
            print_notifications(&list);
        }
        NotificationsCommand::Read { id } => {
            let id = resolve(engine, &id).await?;
            store.mark_as_read(&id).await;
            print_success_json("Notification marked as read", Some(id));
        }
        NotificationsCommand::ReadAll { user } => {
            let count = match &user {
                Some(user) => store.mark_all_as_read_for(user).await,
                None => store.mark_all_as_read().await,
            };
            print_success_json(&format!("Marked {} notification(s) as read", count), Some(count));
        }
        NotificationsCommand::Remove { id } => {
            let id = resolve(engine, &id).await?;
            store.remove(&id).await;
            print_success_json("Notification removed", Some(id));
        }
        NotificationsCommand::Clear => {
            let count = store.list().await.len();
            store.clear().await;
            print_success_json(&format!("Cleared {} notification(s)", count), Some(count));
        }
    }

    Ok(())
}

async fn resolve(engine: &NotificationEngine, id: &str) -> Result<String> {
    let all = engine.notifications().list().await;
    match super::resolve_id(all.iter().map(|n| n.id.as_str()), id) {
        Some(id) => Ok(id),
        None => {
            let err = Error::NotificationNotFound(id.to_string());
            print_error(&err.to_string());
            bail!(err)
        }
    }
}
