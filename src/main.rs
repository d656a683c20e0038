use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use waya_miniapp::Config;
use waya_miniapp::manifest::ManifestBuilder;
use waya_miniapp::web::{AppState, start_server};

const DEFAULT_FILTER: &str = "waya_miniapp=info,tower_http=info";

#[derive(Parser, Debug)]
#[command(name = "waya-miniapp", version, about = "Waya mini-app manifest service")]
struct Cli {
    /// TOML config file (defaults to ~/.waya-miniapp/config.toml).
    #[arg(long, env = "MINIAPP_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the manifest over HTTP (default).
    Serve,
    /// Print the manifest that would be served for ORIGIN.
    Manifest {
        #[arg(long)]
        origin: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let config = Config::from_env_with_toml(cli.config.as_deref())?;
    tracing::debug!(?config.retry, "Wallet retry policy");

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await?,
        Command::Manifest { origin } => {
            let manifest = ManifestBuilder::new(config.manifest).build(origin.as_deref());
            println!("{}", serde_json::to_string_pretty(&manifest)?);
        }
    }
    Ok(())
}

async fn serve(config: Config) -> waya_miniapp::Result<()> {
    let addr = config.server.socket_addr()?;
    let state = Arc::new(AppState::new(ManifestBuilder::new(config.manifest)));
    let handle = start_server(addr, state).await?;

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    handle.shutdown().await?;
    Ok(())
}
