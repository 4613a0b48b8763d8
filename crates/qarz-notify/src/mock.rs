//! Mock implementations for testing

use crate::channel::{ChannelSender, SendOutcome};
use crate::error::{NotifyError, Result};
use async_trait::async_trait;
use qarz_core::Channel;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

/// What the mock does when asked to send
#[derive(Debug, Clone)]
pub enum MockBehavior {
    Succeed,
    /// Provider answers with `success: false`
    Reject(String),
    /// Transport error
    Error(String),
    /// Never answers in practice
    Hang,
    Panic,
}

/// A message recorded by [`MockSender`]
#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub destination: String,
    pub title: String,
    pub body: String,
}

/// A mock sender for testing that records all sent messages
pub struct MockSender {
    channel: Channel,
    behavior: MockBehavior,
    messages: Mutex<Vec<SentMessage>>,
    call_count: AtomicUsize,
}

impl MockSender {
    pub fn new(channel: Channel) -> Self {
        Self::with_behavior(channel, MockBehavior::Succeed)
    }

    pub fn with_behavior(channel: Channel, behavior: MockBehavior) -> Self {
        Self {
            channel,
            behavior,
            messages: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Get the number of times send was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Get all sent messages
    pub async fn messages(&self) -> Vec<SentMessage> {
        self.messages.lock().await.clone()
    }
}

#[async_trait]
impl ChannelSender for MockSender {
    fn channel(&self) -> Channel {
        self.channel
    }

    async fn send(&self, destination: &str, title: &str, body: &str) -> Result<SendOutcome> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            MockBehavior::Succeed => {
                let mut messages = self.messages.lock().await;
                messages.push(SentMessage {
                    destination: destination.to_string(),
                    title: title.to_string(),
                    body: body.to_string(),
                });
                Ok(SendOutcome::ok_with_id(format!("mock-{}", messages.len())))
            }
            MockBehavior::Reject(reason) => Ok(SendOutcome::failed(reason.clone())),
            MockBehavior::Error(reason) => Err(NotifyError::gateway(reason.clone())),
            MockBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(SendOutcome::ok())
            }
            MockBehavior::Panic => panic!("mock sender panicked"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_sender_records_messages() {
        let sender = MockSender::new(Channel::Sms);
        sender.send("0750", "Hello", "world").await.unwrap();
        let outcome = sender.send("0770", "Again", "body").await.unwrap();

        assert_eq!(outcome.message_id.as_deref(), Some("mock-2"));
        assert_eq!(sender.call_count(), 2);
        let messages = sender.messages().await;
        assert_eq!(messages[0].destination, "0750");
        assert_eq!(messages[1].title, "Again");
    }

    #[tokio::test]
    async fn test_mock_sender_reject_and_error() {
        let rejecting = MockSender::with_behavior(Channel::Email, MockBehavior::Reject("bounced".into()));
        let outcome = rejecting.send("a@b.c", "t", "b").await.unwrap();
        assert!(!outcome.success);

        let failing = MockSender::with_behavior(Channel::Email, MockBehavior::Error("down".into()));
        assert!(failing.send("a@b.c", "t", "b").await.is_err());
        assert!(failing.messages().await.is_empty());
    }
}
