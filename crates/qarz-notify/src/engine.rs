//! Notification engine - wires stores, dispatcher, evaluator and notifiers
//! over one persistence backend

use chrono::{DateTime, Utc};
use qarz_core::{BusinessEvent, Channel, EngineConfig, Notification, NotificationDraft};
use qarz_db::{Database, KvBackend};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::channel::ChannelRegistry;
use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::evaluator::RuleEvaluator;
use crate::notifier::Notifiers;
use crate::store::{
    LogStore, NotificationStore, RuleStore, ScheduledNotification, ScheduledStore, SettingsStore,
    TemplateStore,
};

pub struct NotificationEngine {
    database: Option<Arc<Database>>,
    notifications: Arc<NotificationStore>,
    logs: Arc<LogStore>,
    settings: Arc<SettingsStore>,
    templates: Arc<TemplateStore>,
    rules: Arc<RuleStore>,
    scheduled: ScheduledStore,
    dispatcher: Arc<Dispatcher>,
    evaluator: RuleEvaluator,
    notifiers: Notifiers,
}

impl NotificationEngine {
    /// Open the SQLite database named by the config and register its gateways
    pub async fn open(config: &EngineConfig) -> Result<Self> {
        let db_path = config.db_path();
        let database = Arc::new(Database::new(&db_path).await?);
        info!("Opened notification store at {}", db_path.display());

        let registry = ChannelRegistry::from_config(config);
        let mut engine =
            Self::with_backend(database.clone(), registry, config.send_timeout()).await;
        engine.database = Some(database);
        Ok(engine)
    }

    /// Build an engine over any backend, e.g. [`qarz_db::MemoryBackend`]
    pub async fn with_backend(
        backend: Arc<dyn KvBackend>,
        registry: ChannelRegistry,
        send_timeout: Duration,
    ) -> Self {
        let notifications = Arc::new(NotificationStore::load(backend.clone()).await);
        let logs = Arc::new(LogStore::load(backend.clone()).await);
        let settings = Arc::new(SettingsStore::load(backend.clone()).await);
        let templates = Arc::new(TemplateStore::load(backend.clone()).await);
        let rules = Arc::new(RuleStore::load(backend.clone()).await);
        let scheduled = ScheduledStore::load(backend).await;

        let dispatcher = Arc::new(Dispatcher::new(
            notifications.clone(),
            logs.clone(),
            settings.clone(),
            registry,
            send_timeout,
        ));
        let evaluator = RuleEvaluator::new(rules.clone(), dispatcher.clone());
        let notifiers = Notifiers::new(dispatcher.clone(), templates.clone(), settings.clone());

        Self {
            database: None,
            notifications,
            logs,
            settings,
            templates,
            rules,
            scheduled,
            dispatcher,
            evaluator,
            notifiers,
        }
    }

    pub fn notifications(&self) -> &NotificationStore {
        &self.notifications
    }

    pub fn logs(&self) -> &LogStore {
        &self.logs
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn templates(&self) -> &TemplateStore {
        &self.templates
    }

    pub fn rules(&self) -> &RuleStore {
        &self.rules
    }

    pub fn scheduled(&self) -> &ScheduledStore {
        &self.scheduled
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn notifiers(&self) -> &Notifiers {
        &self.notifiers
    }

    pub async fn dispatch(&self, draft: NotificationDraft, channels: &[Channel]) -> Notification {
        self.dispatcher.dispatch(draft, channels).await
    }

    /// Run a business event through every enabled manager rule
    pub async fn evaluate(&self, event: &BusinessEvent) -> Vec<Notification> {
        self.evaluator.evaluate(event).await
    }

    pub async fn schedule(
        &self,
        draft: NotificationDraft,
        channels: Vec<Channel>,
        at: DateTime<Utc>,
    ) -> ScheduledNotification {
        let entry = self.scheduled.schedule(draft, channels, at).await;
        debug!(id = %entry.id, at = %entry.scheduled_for, "Notification scheduled");
        entry
    }

    pub async fn cancel(&self, id: &str) -> bool {
        self.scheduled.cancel(id).await
    }

    /// Dispatch every scheduled entry whose time has come, earliest first
    pub async fn process_due(&self, now: DateTime<Utc>) -> Vec<Notification> {
        let due = self.scheduled.take_due(now).await;
        if due.is_empty() {
            return Vec::new();
        }
        info!(count = due.len(), "Dispatching scheduled notifications");

        let mut sent = Vec::with_capacity(due.len());
        for entry in due {
            sent.push(self.dispatcher.dispatch(entry.draft, &entry.channels).await);
        }
        sent
    }

    /// Close the underlying database, if any
    pub async fn close(&self) {
        if let Some(db) = &self.database {
            db.close().await;
        }
    }
}
