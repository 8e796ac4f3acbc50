//! Vanilla flavor plugin server

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use vanilla_flavor::config::FlavorServerConfig;
use vanilla_flavor::{logging, new_plugin, rpc, shutdown};

#[derive(Parser)]
#[command(author, version, about = "Vanilla flavor plugin", long_about = None)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long, env = "VANILLA_FLAVOR_CONFIG")]
    config: Option<PathBuf>,

    /// Plugin name
    #[arg(long)]
    name: Option<String>,

    /// Host address to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn load_config(&self) -> anyhow::Result<FlavorServerConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let mut config = FlavorServerConfig::load_from_file(path)?;
                config.apply_env_overrides();
                config
            }
            None => FlavorServerConfig::load()?,
        };

        if let Some(name) = &self.name {
            config.server.name = name.clone();
        }
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = args.load_config().context("Invalid configuration")?;

    let _log_guard = logging::init(&config.logging)?;

    let app = rpc::router(Arc::new(new_plugin()), &config.server.name);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(name = %config.server.name, "Flavor plugin listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await?;

    info!("Flavor plugin stopped");
    Ok(())
}
