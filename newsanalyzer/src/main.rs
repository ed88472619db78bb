/*
newsanalyzer - HTTP server
Loads configuration and model artifacts once, then serves /summarize and /chat.
*/

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use newsanalyzer::app;
use newsanalyzer::server::launch_rocket;

#[derive(Parser, Debug)]
#[command(name = "newsanalyzer", about = "News article analysis server")]
struct Args {
    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override models.path from the configuration
    #[arg(long, value_name = "DIR")]
    models_dir: Option<PathBuf>,

    /// Override log level (info, debug, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    // API keys may live in a .env file next to the binary
    if dotenv::dotenv().is_ok() {
        info!(".env file loaded");
    }

    let config = match app::load_config(args.config).await {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("failed to load configuration: {:#}", e);
            return Err(e);
        }
    };

    let state = match app::build_state(&config, args.models_dir.as_deref()) {
        Ok(state) => state,
        Err(e) => {
            error!("failed to initialize analyzer: {:#}", e);
            return Err(e);
        }
    };

    info!("Launching Rocket HTTP server");
    if let Err(e) = launch_rocket(state, &config.server).await {
        error!(%e, "Rocket server failed");
        return Err(e);
    }

    info!("Shutdown complete");
    Ok(())
}
