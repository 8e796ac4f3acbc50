///! Vanilla flavor CLI
///!
///! Command-line client for a running flavor plugin

mod api;
mod commands;
mod input;
mod output;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use commands::flavor::AllocationArgs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Flavor plugin address
    #[arg(short, long, env = "VANILLA_FLAVOR_URL", default_value = "http://127.0.0.1:24864")]
    server: String,

    /// Output format (json, yaml)
    #[arg(short, long, default_value = "json")]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the interfaces the plugin implements
    Implements,
    /// Validate flavor properties
    Validate {
        /// Flavor properties file (JSON or YAML)
        properties: PathBuf,
        #[command(flatten)]
        allocation: AllocationArgs,
    },
    /// Prepare an instance spec with the flavor
    Prepare {
        /// Flavor properties file (JSON or YAML)
        properties: PathBuf,
        /// Instance spec file (JSON or YAML)
        spec: PathBuf,
        #[command(flatten)]
        allocation: AllocationArgs,
    },
    /// Check the health of an instance
    Healthy {
        /// Flavor properties file (JSON or YAML)
        properties: PathBuf,
        /// Instance description file (JSON or YAML)
        instance: PathBuf,
    },
    /// Drain an instance before termination
    Drain {
        /// Flavor properties file (JSON or YAML)
        properties: PathBuf,
        /// Instance description file (JSON or YAML)
        instance: PathBuf,
    },
    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = api::RpcClient::new(&cli.server);

    match cli.command {
        Commands::Implements => commands::flavor::implements(&client, &cli.output).await?,
        Commands::Validate {
            properties,
            allocation,
        } => commands::flavor::validate(&client, &properties, &allocation).await?,
        Commands::Prepare {
            properties,
            spec,
            allocation,
        } => {
            commands::flavor::prepare(&client, &properties, &spec, &allocation, &cli.output)
                .await?
        }
        Commands::Healthy {
            properties,
            instance,
        } => commands::flavor::healthy(&client, &properties, &instance, &cli.output).await?,
        Commands::Drain {
            properties,
            instance,
        } => commands::flavor::drain(&client, &properties, &instance).await?,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "vanilla", &mut std::io::stdout());
        }
    }

    Ok(())
}
