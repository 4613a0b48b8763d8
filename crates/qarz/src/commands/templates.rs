//! Templates command

use anyhow::{bail, Result};
use qarz_core::Error;
use std::path::Path;

use crate::cli::{TemplatesArgs, TemplatesCommand};
use crate::output::{print_error, print_success_json, print_templates};

pub async fn execute(config: Option<&Path>, args: TemplatesArgs) -> Result<()> {
    let engine = super::open_engine(config).await?;
    let templates = engine.templates();

    let result = match args.command {
        TemplatesCommand::List => {
            print_templates(&templates.list().await);
            Ok(())
        }
        TemplatesCommand::Enable { id } => set_active(templates, &id, true).await,
        TemplatesCommand::Disable { id } => set_active(templates, &id, false).await,
    };

    engine.close().await;
    result
}

async fn set_active(templates: &qarz_notify::store::TemplateStore, id: &str, active: bool) -> Result<()> {
    if !templates.set_active(id, active).await {
        let err = Error::TemplateNotFound(id.to_string());
        print_error(&err.to_string());
        bail!(err);
    }
    let state = if active { "activated" } else { "deactivated" };
    print_success_json(&format!("Template {} {}", id, state), Some(id));
    Ok(())
}
