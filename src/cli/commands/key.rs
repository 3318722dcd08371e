use clap::Subcommand;
use serde_json::json;

use crate::auth;
use crate::cli::OutputFormat;
use crate::config;
use crate::settings::{FileSettingsStore, SettingsStore, SETTING_API_KEY};

#[derive(Subcommand)]
pub enum KeyCommands {
    #[command(about = "Generate and store a new API key (replaces any existing key)")]
    Generate,

    #[command(about = "Show the currently configured API key")]
    Show,
}

pub async fn handle(cmd: KeyCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let store = FileSettingsStore::new(&config::config().settings_file);

    match cmd {
        KeyCommands::Generate => {
            let key = auth::generate_api_key();
            store.set(SETTING_API_KEY, &key).await?;

            match output_format {
                OutputFormat::Json => println!("{}", json!({ "api_key": key })),
                OutputFormat::Text => {
                    println!("New API key generated and saved:");
                    println!("{}", key);
                }
            }
            Ok(())
        }
        KeyCommands::Show => {
            let key = store.get(SETTING_API_KEY).await?;

            match output_format {
                OutputFormat::Json => println!("{}", json!({ "api_key": key })),
                OutputFormat::Text => match key {
                    Some(key) => println!("{}", key),
                    None => println!("(not set)"),
                },
            }
            Ok(())
        }
    }
}
