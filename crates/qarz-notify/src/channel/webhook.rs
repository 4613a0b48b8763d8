//! HTTP gateway backend for SMS, email, WhatsApp, Viber and push

use async_trait::async_trait;
use qarz_core::Channel;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::{ChannelSender, SendOutcome};
use crate::error::Result;

/// Gateway response body. Providers differ, so every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GatewayResponse {
    ok: Option<bool>,
    success: Option<bool>,
    id: Option<String>,
    message_id: Option<String>,
    error: Option<String>,
    description: Option<String>,
}

/// Request body posted to the gateway
#[derive(Debug, Serialize)]
struct GatewayRequest<'a> {
    channel: &'a str,
    to: &'a str,
    title: &'a str,
    body: &'a str,
}

/// Sender posting messages to an HTTP gateway
pub struct WebhookSender {
    channel: Channel,
    url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl WebhookSender {
    /// Create over an HTTP client, usually one shared by every gateway
    pub fn with_client(
        channel: Channel,
        url: String,
        token: Option<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            channel,
            url,
            token,
            client,
        }
    }
}

/// Interpret a gateway reply
fn outcome_from_response(status: reqwest::StatusCode, text: &str) -> SendOutcome {
    let body: GatewayResponse = serde_json::from_str(text).unwrap_or_default();
    let accepted = body.ok.or(body.success).unwrap_or(true);

    if status.is_success() && accepted {
        SendOutcome {
            success: true,
            message_id: body.message_id.or(body.id),
            error: None,
        }
    } else {
        let reason = body
            .error
            .or(body.description)
            .unwrap_or_else(|| format!("HTTP {}", status));
        SendOutcome::failed(reason)
    }
}

#[async_trait]
impl ChannelSender for WebhookSender {
    fn channel(&self) -> Channel {
        self.channel
    }

    async fn send(&self, destination: &str, title: &str, body: &str) -> Result<SendOutcome> {
        let request = GatewayRequest {
            channel: self.channel.as_str(),
            to: destination,
            title,
            body,
        };

        debug!(channel = %self.channel, "Posting message to gateway {}", self.url);

        let mut builder = self.client.post(&self.url).json(&request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let outcome = outcome_from_response(status, &text);

        if outcome.success {
            info!(channel = %self.channel, "Gateway accepted message");
        } else {
            error!(
                channel = %self.channel,
                "Gateway rejected message: {}",
                outcome.error.as_deref().unwrap_or_default()
            );
        }
        Ok(outcome)
    }
}
