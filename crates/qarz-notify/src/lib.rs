//! Qarz Notification Engine
//!
//! Turns ledger activity into user-facing notifications:
//! - templates rendered with `{{variable}}` placeholders
//! - multi-channel fan-out (in-app, SMS, email, WhatsApp, Viber, push) with
//!   one delivery log per attempted channel
//! - manager rules evaluated against business events
//! - scheduled notifications released by [`NotificationEngine::process_due`]

pub mod channel;
pub mod dispatch;
pub mod engine;
mod error;
pub mod evaluator;
#[cfg(test)]
pub mod mock;
pub mod notifier;
pub mod render;
pub mod store;

pub use channel::{ChannelRegistry, ChannelSender, InAppSender, SendOutcome, WebhookSender};
pub use dispatch::Dispatcher;
pub use engine::NotificationEngine;
pub use error::{NotifyError, Result};
pub use evaluator::RuleEvaluator;
pub use notifier::{
    CustomerAlert, CustomerAlertKind, DebtNotice, Notifiers, PaymentNotice, ReceiptNotice,
};
pub use render::{render, render_str, Rendered, Variables};
