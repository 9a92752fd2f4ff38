//! Configuration command implementation

use crate::cli::context::CliContext;
use crate::config::{ConfigKey, ConfigValue, GlobalConfig};
use anyhow::{anyhow, Result};
use colored::Colorize;

/// Execute the config command
pub fn execute(
    key: Option<String>,
    value: Option<String>,
    list: bool,
    unset: bool,
    show_origin: bool,
    json: bool,
) -> Result<()> {
    let config_path = CliContext::config_path()?;
    let mut config = GlobalConfig::load_from(&config_path)?;

    if show_origin {
        if json {
            println!(
                "{}",
                serde_json::json!({
                    "config_file": config_path.display().to_string(),
                    "exists": config_path.exists()
                })
            );
        } else {
            println!(
                "{}: {}",
                "Configuration file".bold(),
                config_path.display().to_string().cyan()
            );
            if config_path.exists() {
                println!("{}: {}", "Status".bold(), "exists".green());
            } else {
                println!("{}: {}", "Status".bold(), "not created yet".yellow());
            }
        }
        return Ok(());
    }

    if list {
        return list_configuration(&config, json);
    }

    let Some(key_str) = key else {
        show_usage(json);
        return Ok(());
    };
    let config_key = ConfigKey::parse(&key_str);

    if unset {
        config.unset(&config_key);
        config.save_to(&config_path)?;

        if json {
            println!(
                "{}",
                serde_json::json!({
                    "action": "unset",
                    "key": key_str,
                    "status": "success"
                })
            );
        } else {
            println!("{} {}", "✓".green(), format!("Unset {}", key_str).bold());
        }
    } else if let Some(value_str) = value {
        config.set(config_key, ConfigValue::parse(&value_str))?;
        config.save_to(&config_path)?;

        if json {
            println!(
                "{}",
                serde_json::json!({
                    "action": "set",
                    "key": key_str,
                    "value": value_str,
                    "status": "success"
                })
            );
        } else {
            println!("{} {} = {}", "✓".green(), key_str.bold(), value_str.cyan());
        }
    } else if let Some(value) = config.get(&config_key) {
        if json {
            println!(
                "{}",
                serde_json::json!({
                    "key": key_str,
                    "value": value.to_string()
                })
            );
        } else {
            println!("{}", value);
        }
    } else if json {
        println!(
            "{}",
            serde_json::json!({
                "key": key_str,
                "value": null,
                "error": "not set"
            })
        );
    } else {
        eprintln!(
            "{}",
            format!("Configuration key '{}' is not set", key_str).yellow()
        );
        return Err(anyhow!("Configuration key not found"));
    }

    Ok(())
}

fn show_usage(json: bool) {
    if json {
        println!(
            "{}",
            serde_json::json!({
                "error": "No configuration key specified",
                "usage": "merkleproof config <key> [value] or --list"
            })
        );
        return;
    }

    println!("{}", "Configuration Management".green().bold());
    println!("{}", "═".repeat(40));
    println!();
    println!("{}", "Usage:".bold());
    println!("  {} Get value", "merkleproof config <key>".cyan());
    println!("  {} Set value", "merkleproof config <key> <value>".cyan());
    println!("  {} List all", "merkleproof config --list".cyan());
    println!("  {} Unset value", "merkleproof config --unset <key>".cyan());
    println!();
    println!("{}", "Keys:".bold());
    println!("  {} sha256, sha3-256 or keccak256", "merkle.hash".green());
    println!("  {} carry-forward or duplicate", "merkle.odd_node".green());
    println!("  {} text, json, solidity or hex", "output.format".green());
}

/// List all configuration values
fn list_configuration(config: &GlobalConfig, json: bool) -> Result<()> {
    let entries = config.list();

    if json {
        let config_map: std::collections::BTreeMap<String, String> = entries.into_iter().collect();
        println!("{}", serde_json::to_string_pretty(&config_map)?);
    } else if entries.is_empty() {
        println!("{}", "No configuration values set".yellow());
        println!();
        println!("{}", "To set configuration:".bold());
        println!("  {}", "merkleproof config merkle.hash keccak256".cyan());
    } else {
        println!("{}", "Configuration".green().bold());
        println!("{}", "═".repeat(40));
        println!();

        for (key, value) in entries {
            println!("{} = {}", key.bold(), value.cyan());
        }
    }

    Ok(())
}
