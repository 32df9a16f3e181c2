//! One-shot CLI commands

use anyhow::Result;
use colored::Colorize;

use crate::{config::Config, output::OutputHandler};

/// Keys shown by `buddy config --show`, grouped by section
const CONFIG_KEYS: &[(&str, &[&str])] = &[
    ("server", &["url", "token"]),
    (
        "wizard",
        &["locale", "voice_answers", "settle_delay_ms", "muted"],
    ),
    ("display", &["color"]),
];

pub fn show_config(config: &Config) -> Result<()> {
    let output = OutputHandler::new(config.display.color);

    output.print_header("Configuration");
    println!("  {} {}", "file:".dimmed(), Config::config_path().display());

    for (section, keys) in CONFIG_KEYS {
        println!();
        println!("  {}", format!("[{}]", section).bright_cyan());
        for key in *keys {
            let value = match (*section, *key) {
                ("server", "token") => config
                    .server
                    .token
                    .as_ref()
                    .map(|_| "\"***\"".to_string()),
                _ => config.get(&format!("{}.{}", section, key)),
            };
            println!(
                "    {} = {}",
                key.dimmed(),
                value.unwrap_or_else(|| "not set".dimmed().to_string())
            );
        }
    }
    println!();

    Ok(())
}

pub fn set_config(kv: &str) -> Result<()> {
    let mut config = Config::load()?;
    let output = OutputHandler::new(config.display.color);

    let Some((key, value)) = kv.split_once('=') else {
        output.print_error("Invalid format. Use: key=value");
        return Ok(());
    };
    let key = key.trim();
    let value = value.trim().trim_matches('"');

    match config.set(key, value) {
        Ok(()) => {
            output.print_success(&format!("Set {} = \"{}\"", key, value));
        }
        Err(e) => {
            output.print_error(&format!("Failed to set config: {}", e));
        }
    }

    Ok(())
}
