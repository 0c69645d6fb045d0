//! `sessionnotes config init|show`

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;

use sessionnotes_core::{config, ClientConfig};

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write ~/.sessionnotes/config.yaml, replacing any existing file.
    Init(ConfigInitArgs),
    /// Print the effective configuration with the API key masked.
    Show(ConfigShowArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Project URL, e.g. https://abc.example.co
    #[arg(long)]
    pub url: String,

    /// API key sent as `apikey` and bearer token.
    #[arg(long)]
    pub key: String,

    /// Table holding the notes.
    #[arg(long, default_value = config::defaults::TABLE)]
    pub table: String,

    /// Name of the validation function.
    #[arg(long, default_value = config::defaults::VALIDATOR_FUNCTION)]
    pub validator: String,

    /// Per-request timeout in milliseconds.
    #[arg(long, default_value_t = config::defaults::REQUEST_TIMEOUT_MS)]
    pub timeout_ms: u64,
}

#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run(command: ConfigCommand) -> Result<()> {
    let home = dirs::home_dir().context("could not determine home directory")?;

    match command {
        ConfigCommand::Init(args) => {
            let client_config = ClientConfig {
                base_url: args.url.trim().trim_end_matches('/').to_string(),
                api_key: args.key,
                table: args.table,
                validator_function: args.validator,
                request_timeout_ms: args.timeout_ms,
            };
            let path = config::save_at(&home, &client_config)
                .context("failed to write client configuration")?;
            println!("✓ Saved configuration to {}", path.display());
        }
        ConfigCommand::Show(args) => {
            let client_config =
                config::load_at(&home).context("failed to load client configuration")?;
            let view = ConfigView::from(&client_config);
            if args.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&view)
                        .context("failed to serialize configuration JSON")?
                );
            } else {
                println!("base_url:           {}", view.base_url);
                println!("api_key:            {}", view.api_key);
                println!("table:              {}", view.table);
                println!("validator_function: {}", view.validator_function);
                println!("request_timeout_ms: {}", view.request_timeout_ms);
            }
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct ConfigView {
    base_url: String,
    api_key: String,
    table: String,
    validator_function: String,
    request_timeout_ms: u64,
}

impl From<&ClientConfig> for ConfigView {
    fn from(c: &ClientConfig) -> Self {
        Self {
            base_url: c.base_url.clone(),
            api_key: mask_key(&c.api_key),
            table: c.table.clone(),
            validator_function: c.validator_function.clone(),
            request_timeout_ms: c.request_timeout_ms,
        }
    }
}

/// Keep the last four characters visible.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.trim().chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_key_hides_all_but_tail() {
        assert_eq!(mask_key("anon-key-1234"), "****1234");
        assert_eq!(mask_key("abc"), "****");
    }
}
