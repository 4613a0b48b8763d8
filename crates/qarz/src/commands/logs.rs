//! Logs command - delivery attempts per channel

use anyhow::Result;
use std::path::Path;

use crate::output::print_logs;

pub async fn execute(config: Option<&Path>, notification: Option<&str>) -> Result<()> {
    let engine = super::open_engine(config).await?;

    let logs = match notification {
        Some(id) => {
            let all = engine.notifications().list().await;
            let id = super::resolve_id(all.iter().map(|n| n.id.as_str()), id)
                .unwrap_or_else(|| id.to_string());
            engine.logs().for_notification(&id).await
        }
        None => engine.logs().list().await,
    };
    engine.close().await;

    print_logs(&logs);
    Ok(())
}
