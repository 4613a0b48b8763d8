//! Emit command - run a business event through the manager rules

use anyhow::{Context, Result};
use qarz_core::BusinessEvent;
use std::path::Path;

use crate::output::{is_json_mode, print_info, print_notifications};

pub async fn execute(config: Option<&Path>, event_json: &str) -> Result<()> {
    let event: BusinessEvent =
        serde_json::from_str(event_json).context("Invalid event JSON")?;

    let engine = super::open_engine(config).await?;
    let created = engine.evaluate(&event).await;
    engine.close().await;

    if created.is_empty() && !is_json_mode() {
        print_info(&format!("No rule matched {} event", event.event_type()));
        return Ok(());
    }
    print_notifications(&created);
    Ok(())
}
