use anyhow::Result;
use clap::arg;
use clap::command;
use clap::Parser;
use fin_bridge::server;
use fin_bridge::server::server::AppState;
use fin_bridge::utils::config_loader;
use fin_bridge::utils::logging;
use fin_bridge::utils::logging::LogLevel;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "fin-bridge.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Read args
    // -------------------------------

    let args = Args::parse();

    // -------------------------------
    // 2. Load YAML config, refuse to start on missing credentials
    // -------------------------------

    let service_config = config_loader::run(&args.config).await?;
    logging::run(&service_config, args.log_level).await?;

    // -------------------------------
    // 3. Build vendor clients and shared state
    // -------------------------------

    let state = AppState::new(&service_config).await?;

    // -------------------------------
    // 4. Serve
    // -------------------------------

    info!("Service starting...");
    server::server::start(&service_config.settings, state).await?;

    Ok(())
}
