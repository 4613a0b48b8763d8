//! Gateway command - HTTP endpoints for external channels

use anyhow::{bail, Result};
use qarz_core::{Channel, GatewayConfig};
use std::path::Path;

use crate::cli::{GatewayArgs, GatewayCommand};
use crate::output::{is_json_mode, print_error, print_info, print_success};

pub fn execute(config: Option<&Path>, args: GatewayArgs) -> Result<()> {
    let path = super::config_file(config);

    match args.command {
        GatewayCommand::Set {
            channel,
            url,
            token,
        } => {
            if channel == Channel::InApp {
                print_error("in_app is delivered locally and takes no gateway");
                bail!("Invalid gateway channel: {}", channel);
            }
            let mut engine_config = qarz_core::EngineConfig::load_from(&path)?;
            engine_config.set_gateway(channel, Some(GatewayConfig { url, token }));
            engine_config.save_to(&path)?;

            print_success(&format!("Gateway for {} configured", channel));
            print_info(&format!("Config saved to: {}", path.display()));
        }
        GatewayCommand::Remove { channel } => {
            let mut engine_config = qarz_core::EngineConfig::load_from(&path)?;
            engine_config.set_gateway(channel, None);
            engine_config.save_to(&path)?;
            print_success(&format!("Gateway for {} removed", channel));
        }
        GatewayCommand::Status => {
            let engine_config = qarz_core::EngineConfig::load_from(&path)?;

            if is_json_mode() {
                println!("{}", serde_json::to_string_pretty(&engine_config.gateways)?);
                return Ok(());
            }

            println!();
            println!("Gateway Configuration");
            println!("{}", "=".repeat(40));
            for channel in Channel::ALL {
                if channel == Channel::InApp {
                    continue;
                }
                match engine_config.gateway(channel) {
                    Some(gateway) => println!(
                        "{:<10} {}{}",
                        channel.as_str(),
                        gateway.url,
                        if gateway.token.is_some() { " (token set)" } else { "" }
                    ),
                    None => println!("{:<10} not configured", channel.as_str()),
                }
            }
            println!();
            println!("Send timeout: {}s", engine_config.send_timeout_secs);
            println!("Config file: {}", path.display());
        }
    }

    Ok(())
}
