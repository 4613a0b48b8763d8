//! Rules command - manager notification rules

use anyhow::{bail, Context, Result};
use qarz_core::{Error, RuleCondition, RuleDraft};
use qarz_notify::NotificationEngine;
use std::path::Path;

use crate::cli::{RulesArgs, RulesCommand};
use crate::output::{is_json_mode, print_error, print_info, print_rules, print_success_json};

pub async fn execute(config: Option<&Path>, args: RulesArgs) -> Result<()> {
    let engine = super::open_engine(config).await?;
    let result = run(&engine, args.command).await;
    engine.close().await;
    result
}

async fn run(engine: &NotificationEngine, command: RulesCommand) -> Result<()> {
    let rules = engine.rules();

    match command {
        RulesCommand::List => print_rules(&rules.list().await),
        RulesCommand::Add {
            name,
            condition,
            recipients,
            channels,
            priority,
            disabled,
        } => {
            let condition: RuleCondition =
                serde_json::from_str(&condition).context("Invalid rule condition JSON")?;
            let rule = rules
                .add(RuleDraft {
                    name,
                    condition,
                    recipients,
                    channels,
                    priority,
                    enabled: !disabled,
                })
                .await;

            if !is_json_mode() {
                print_info(&format!("Condition: {}", rule.condition.describe()));
            }
            print_success_json(&format!("Rule {} created", rule.id), Some(&rule));
        }
        RulesCommand::Enable { id } => {
            let id = resolve(engine, &id).await?;
            rules.set_enabled(&id, true).await;
            print_success_json("Rule enabled", Some(id));
        }
        RulesCommand::Disable { id } => {
            let id = resolve(engine, &id).await?;
            rules.set_enabled(&id, false).await;
            print_success_json("Rule disabled", Some(id));
        }
        RulesCommand::Remove { id } => {
            let id = resolve(engine, &id).await?;
            rules.delete(&id).await;
            print_success_json("Rule removed", Some(id));
        }
    }

    Ok(())
}

async fn resolve(engine: &NotificationEngine, id: &str) -> Result<String> {
    let all = engine.rules().list().await;
    match super::resolve_id(all.iter().map(|r| r.id.as_str()), id) {
        Some(id) => Ok(id),
        None => {
            let err = Error::RuleNotFound(id.to_string());
            print_error(&err.to_string());
            bail!(err)
        }
    }
}
