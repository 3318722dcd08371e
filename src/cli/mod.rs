pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lineage")]
#[command(about = "Lineage CLI - administer the genealogical JSON API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "API key management")]
    Key {
        #[command(subcommand)]
        cmd: commands::key::KeyCommands,
    },

    #[command(about = "API settings management")]
    Config {
        #[command(subcommand)]
        cmd: commands::config::ConfigCommands,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Key { cmd } => commands::key::handle(cmd, output_format).await,
        Commands::Config { cmd } => commands::config::handle(cmd, output_format).await,
    }
}
