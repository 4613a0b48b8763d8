//! In-app channel. The notification record itself is the delivery.

use async_trait::async_trait;
use qarz_core::Channel;

use super::{ChannelSender, SendOutcome};
use crate::error::Result;

pub struct InAppSender;

#[async_trait]
impl ChannelSender for InAppSender {
    fn channel(&self) -> Channel {
        Channel::InApp
    }

    fn confirms_delivery(&self) -> bool {
        false
    }

    async fn send(&self, _destination: &str, _title: &str, _body: &str) -> Result<SendOutcome> {
        Ok(SendOutcome::ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_app_always_succeeds() {
        let sender = InAppSender;
        let outcome = sender.send("u1", "t", "b").await.unwrap();
        assert!(outcome.success);
        assert!(!sender.confirms_delivery());
    }
}
