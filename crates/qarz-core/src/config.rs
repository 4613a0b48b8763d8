//! Engine configuration file (`~/.qarz/config.toml`)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::constants::{config_path, db_path_in, qarz_home, DEFAULT_SEND_TIMEOUT_SECS};
use crate::error::Result;
use crate::types::Channel;

fn default_send_timeout_secs() -> u64 {
    DEFAULT_SEND_TIMEOUT_SECS
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory holding the database (default: ~/.qarz)
    pub data_dir: Option<PathBuf>,

    /// Per-channel send timeout in seconds
    #[serde(default = "default_send_timeout_secs")]
    pub send_timeout_secs: u64,

    /// HTTP gateways for external channels
    #[serde(default)]
    pub gateways: GatewaysConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            send_timeout_secs: DEFAULT_SEND_TIMEOUT_SECS,
            gateways: GatewaysConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load config from the default path
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("Config not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: EngineConfig = toml::from_str(&content)?;

        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, &content)?;

        // Gateway tokens are secrets
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)) {
                tracing::warn!("Failed to set config file permissions: {}", e);
            }
        }

        info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Resolved data directory
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(qarz_home)
    }

    /// Resolved database path
    pub fn db_path(&self) -> PathBuf {
        db_path_in(&self.data_dir())
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_secs(self.send_timeout_secs.max(1))
    }

    /// Gateway configured for a channel, if any
    pub fn gateway(&self, channel: Channel) -> Option<&GatewayConfig> {
        match channel {
            Channel::Sms => self.gateways.sms.as_ref(),
            Channel::Email => self.gateways.email.as_ref(),
            Channel::Whatsapp => self.gateways.whatsapp.as_ref(),
            Channel::Viber => self.gateways.viber.as_ref(),
            Channel::Push => self.gateways.push.as_ref(),
            Channel::InApp => None,
        }
    }

    /// Configure the gateway for a channel. In-app needs none and is ignored.
    pub fn set_gateway(&mut self, channel: Channel, gateway: Option<GatewayConfig>) {
        let slot = match channel {
            Channel::Sms => &mut self.gateways.sms,
            Channel::Email => &mut self.gateways.email,
            Channel::Whatsapp => &mut self.gateways.whatsapp,
            Channel::Viber => &mut self.gateways.viber,
            Channel::Push => &mut self.gateways.push,
            Channel::InApp => return,
        };
        *slot = gateway;
    }
}

/// Gateway endpoints per external channel
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewaysConfig {
    pub sms: Option<GatewayConfig>,
    pub email: Option<GatewayConfig>,
    pub whatsapp: Option<GatewayConfig>,
    pub viber: Option<GatewayConfig>,
    pub push: Option<GatewayConfig>,
}

/// HTTP endpoint for a delivery gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// URL receiving `POST {to, title, body}`
    pub url: String,

    /// Optional bearer token
    pub token: Option<String>,
}
