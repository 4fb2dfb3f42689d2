//! Wave Radio - HTTP proxy streaming extracted audio

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use wave_radio::config::Config;
use wave_radio::error::Result;
use wave_radio::proxy::ProxyServer;

/// Wave Radio - stream audio from any page the extraction tool understands
#[derive(Parser)]
#[command(name = "wave-radio")]
#[command(about = "HTTP proxy that streams extracted audio from a source URL")]
#[command(version)]
pub struct Cli {
    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Port to listen on (overrides PORT and the config file)
    #[arg(long, short = 'p', global = true)]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the proxy server (default command)
    #[command(name = "serve")]
    Serve,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    match cli.command {
        None | Some(Command::Serve) => serve(cli.config, cli.port).await,
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,wave_radio=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn serve(config_path: Option<PathBuf>, port: Option<u16>) -> Result<()> {
    tracing::info!("Starting Wave Radio Proxy");

    let mut config = Config::load(config_path.as_deref())?;
    config.apply_port_env(std::env::var("PORT").ok().as_deref())?;
    if let Some(port) = port {
        config.server.port = port;
    }
    tracing::debug!("Config loaded: {:?}", config);

    ProxyServer::new(config).serve().await?;

    tracing::info!("Wave Radio Proxy stopped");
    Ok(())
}
