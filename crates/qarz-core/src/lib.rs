//! Qarz Core - Shared notification types, configuration, and error handling

pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod rule;
pub mod settings;
pub mod types;

pub use config::{EngineConfig, GatewayConfig, GatewaysConfig};
pub use constants::*;
pub use error::{Error, Result};
pub use event::BusinessEvent;
pub use rule::{ManagerNotificationRule, RuleCondition, RuleDraft, RulePatch};
pub use settings::{NotificationSettings, NotificationSettingsPatch, ReminderFrequency};
pub use types::*;
