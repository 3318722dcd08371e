use clap::Subcommand;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::config;
use crate::settings::{
    ApiConfig, FileSettingsStore, SettingsStore, SETTING_ENABLED, SETTING_LOG_REQUESTS,
};

#[derive(Subcommand)]
pub enum ConfigCommands {
    #[command(about = "Show the current API settings")]
    Show,

    #[command(about = "Update API settings")]
    Set {
        #[arg(long, help = "Enable or disable the API")]
        enabled: Option<bool>,

        #[arg(long, help = "Enable or disable request logging")]
        logging: Option<bool>,
    },
}

pub async fn handle(cmd: ConfigCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let store = FileSettingsStore::new(&config::config().settings_file);

    match cmd {
        ConfigCommands::Show => {
            let api = ApiConfig::load(&store).await?;
            print_config(&api, output_format);
            Ok(())
        }
        ConfigCommands::Set { enabled, logging } => {
            if enabled.is_none() && logging.is_none() {
                anyhow::bail!("nothing to set; pass --enabled and/or --logging");
            }

            if let Some(enabled) = enabled {
                store.set(SETTING_ENABLED, flag(enabled)).await?;
            }
            if let Some(logging) = logging {
                store.set(SETTING_LOG_REQUESTS, flag(logging)).await?;
            }

            let api = ApiConfig::load(&store).await?;
            print_config(&api, output_format);
            Ok(())
        }
    }
}

fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

fn print_config(api: &ApiConfig, output_format: OutputFormat) {
    match output_format {
        OutputFormat::Json => println!(
            "{}",
            json!({
                "enabled": api.enabled,
                "logging": api.logging_enabled,
                "api_key_set": !api.secret_key.is_empty(),
            })
        ),
        OutputFormat::Text => {
            println!("enabled: {}", api.enabled);
            println!("logging: {}", api.logging_enabled);
            println!(
                "api key: {}",
                if api.secret_key.is_empty() {
                    "(not set)"
                } else {
                    "(set)"
                }
            );
        }
    }
}
