//! Dispatcher - persist a notification and fan it out over channels
//!
//! The notification is stored before any channel is attempted. Each channel
//! is then sent on its own task with a bounded timeout, and the resulting
//! logs are appended in one batch once every attempt has finished. A failing
//! channel never affects its siblings or the stored notification.

use futures::future::join_all;
use qarz_core::{
    Channel, Contacts, DeliveryStatus, Notification, NotificationDraft, NotificationLog,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::channel::{ChannelRegistry, ChannelSender};
use crate::error::NotifyError;
use crate::store::{LogStore, NotificationStore, SettingsStore};

pub struct Dispatcher {
    notifications: Arc<NotificationStore>,
    logs: Arc<LogStore>,
    settings: Arc<SettingsStore>,
    registry: ChannelRegistry,
    send_timeout: Duration,
}

impl Dispatcher {
    pub fn new(
        notifications: Arc<NotificationStore>,
        logs: Arc<LogStore>,
        settings: Arc<SettingsStore>,
        registry: ChannelRegistry,
        send_timeout: Duration,
    ) -> Self {
        Self {
            notifications,
            logs,
            settings,
            registry,
            send_timeout,
        }
    }

    /// Persist the draft and attempt every requested channel.
    ///
    /// Always returns the stored notification, even if every channel fails.
    pub async fn dispatch(&self, draft: NotificationDraft, channels: &[Channel]) -> Notification {
        let contacts = match draft.contacts.clone() {
            Some(contacts) => contacts,
            None => self.settings.get(&draft.user_id).await.contacts(),
        };

        let notification = self
            .notifications
            .add(Notification::from_draft(draft, channels))
            .await;
        debug!(
            notification_id = %notification.id,
            kind = %notification.kind,
            channels = channels.len(),
            "Notification stored, sending"
        );

        let attempts = channels
            .iter()
            .map(|channel| self.attempt(&notification, *channel, &contacts));
        let logs = join_all(attempts).await;

        let failed = logs
            .iter()
            .filter(|l| l.status == DeliveryStatus::Failed)
            .count();
        info!(
            notification_id = %notification.id,
            attempted = logs.len(),
            failed,
            "Dispatch complete"
        );

        self.logs.append_batch(logs).await;
        notification
    }

    async fn attempt(
        &self,
        notification: &Notification,
        channel: Channel,
        contacts: &Contacts,
    ) -> NotificationLog {
        let result = match self.resolve(channel, contacts, &notification.user_id) {
            Ok((sender, destination)) => {
                self.send_isolated(sender, destination, notification).await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(outcome) if outcome.success => {
                let status = if outcome.confirmed {
                    DeliveryStatus::Delivered
                } else {
                    DeliveryStatus::Sent
                };
                NotificationLog::new(&notification.id, channel, status)
                    .with_message_id(outcome.message_id)
            }
            Ok(outcome) => {
                let reason = outcome.error.unwrap_or_else(|| "send failed".to_string());
                warn!(notification_id = %notification.id, channel = %channel, "Send rejected: {}", reason);
                NotificationLog::failed(&notification.id, channel, reason)
            }
            Err(e) => {
                warn!(notification_id = %notification.id, channel = %channel, "Send failed: {}", e);
                NotificationLog::failed(&notification.id, channel, e.to_string())
            }
        }
    }

    fn resolve(
        &self,
        channel: Channel,
        contacts: &Contacts,
        user_id: &str,
    ) -> Result<(Arc<dyn ChannelSender>, String), NotifyError> {
        let sender = self
            .registry
            .get(channel)
            .ok_or(NotifyError::NoSender(channel))?;
        let destination = contacts
            .destination_for(channel, user_id)
            .ok_or(NotifyError::DestinationMissing(channel))?;
        Ok((sender, destination))
    }

    /// Run one send on its own task so a hang or panic stays contained
    async fn send_isolated(
        &self,
        sender: Arc<dyn ChannelSender>,
        destination: String,
        notification: &Notification,
    ) -> Result<Attempt, NotifyError> {
        let title = notification.title.clone();
        let body = notification.message.clone();
        let limit = self.send_timeout;

        let task = tokio::spawn(async move {
            let confirmed = sender.confirms_delivery();
            match tokio::time::timeout(limit, sender.send(&destination, &title, &body)).await {
                Ok(Ok(outcome)) => Ok(Attempt {
                    success: outcome.success,
                    confirmed,
                    message_id: outcome.message_id,
                    error: outcome.error,
                }),
                Ok(Err(e)) => Err(e),
                Err(_) => Err(NotifyError::Timeout(limit.as_secs())),
            }
        });

        match task.await {
            Ok(result) => result,
            Err(e) => Err(NotifyError::SenderAborted(e.to_string())),
        }
    }
}

/// Outcome of one send plus whether the channel confirms delivery
struct Attempt {
    success: bool,
    confirmed: bool,
    message_id: Option<String>,
    error: Option<String>,
}
