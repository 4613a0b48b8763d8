//! Delivery channel senders

mod in_app;
mod webhook;

pub use in_app::InAppSender;
pub use webhook::WebhookSender;

use async_trait::async_trait;
use qarz_core::{Channel, EngineConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::error::Result;

/// Result reported by a channel provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SendOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }

    pub fn ok_with_id(message_id: impl Into<String>) -> Self {
        Self {
            success: true,
            message_id: Some(message_id.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message_id: None,
            error: Some(error.into()),
        }
    }
}

/// Uniform contract for a delivery channel
#[async_trait]
pub trait ChannelSender: Send + Sync {
    /// Channel this sender delivers on
    fn channel(&self) -> Channel;

    /// Whether a successful send confirms delivery to the recipient.
    /// Senders without confirmation are logged as `sent`.
    fn confirms_delivery(&self) -> bool {
        true
    }

    /// Deliver a message to a destination address
    async fn send(&self, destination: &str, title: &str, body: &str) -> Result<SendOutcome>;
}

/// Senders keyed by channel
#[derive(Clone, Default)]
pub struct ChannelRegistry {
    senders: BTreeMap<Channel, Arc<dyn ChannelSender>>,
}

impl ChannelRegistry {
    /// Registry with no senders at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with only the in-app sender
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(InAppSender));
        registry
    }

    /// In-app plus a webhook sender for every configured gateway.
    /// All gateways share one HTTP client and its connection pool.
    pub fn from_config(config: &EngineConfig) -> Self {
        let mut registry = Self::new();
        let client = reqwest::Client::new();
        for channel in Channel::ALL {
            if let Some(gateway) = config.gateway(channel) {
                debug!(channel = %channel, url = %gateway.url, "Registering gateway sender");
                registry.register(Arc::new(WebhookSender::with_client(
                    channel,
                    gateway.url.clone(),
                    gateway.token.clone(),
                    client.clone(),
                )));
            }
        }
        registry
    }

    /// Register a sender, replacing any previous one for its channel
    pub fn register(&mut self, sender: Arc<dyn ChannelSender>) {
        self.senders.insert(sender.channel(), sender);
    }

    pub fn get(&self, channel: Channel) -> Option<Arc<dyn ChannelSender>> {
        self.senders.get(&channel).cloned()
    }

    /// Channels that have a sender
    pub fn channels(&self) -> Vec<Channel> {
        self.senders.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qarz_core::GatewayConfig;

    #[test]
    fn test_default_registry_has_in_app() {
        let registry = ChannelRegistry::new();
        assert_eq!(registry.channels(), vec![Channel::InApp]);
        assert!(registry.get(Channel::Sms).is_none());
        assert!(ChannelRegistry::empty().channels().is_empty());
    }

    #[test]
    fn test_registry_from_config() {
        let mut config = EngineConfig::default();
        config.set_gateway(
            Channel::Sms,
            Some(GatewayConfig {
                url: "http://localhost:1/sms".into(),
                token: None,
            }),
        );

        let registry = ChannelRegistry::from_config(&config);
        assert_eq!(registry.channels(), vec![Channel::Sms, Channel::InApp]);
        let sms = registry.get(Channel::Sms).unwrap();
        assert_eq!(sms.channel(), Channel::Sms);
        assert!(sms.confirms_delivery());
    }

    #[tokio::test]
    async fn test_registry_gateways_send_over_shared_client() {
        let mut config = EngineConfig::default();
        for (channel, path) in [(Channel::Sms, "sms"), (Channel::Email, "email")] {
            config.set_gateway(
                channel,
                Some(GatewayConfig {
                    url: format!("http://127.0.0.1:9/{}", path),
                    token: Some("secret".into()),
                }),
            );
        }

        let registry = ChannelRegistry::from_config(&config);
        for channel in [Channel::Sms, Channel::Email] {
            let sender = registry.get(channel).unwrap();
            assert_eq!(sender.channel(), channel);
            let result = sender.send("dest", "t", "b").await;
            assert!(matches!(result, Err(crate::NotifyError::HttpError(_))));
        }
    }

    #[test]
    fn test_outcome_constructors() {
        assert!(SendOutcome::ok().success);
        assert_eq!(
            SendOutcome::ok_with_id("m1").message_id.as_deref(),
            Some("m1")
        );
        let failed = SendOutcome::failed("rejected");
        assert!(!failed.success);
        assert_eq!(failed.error.as_deref(), Some("rejected"));
    }
}
