// One-shot analysis of a single URL, printed as JSON.
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

use newsanalyzer::app;

#[derive(Parser, Debug)]
#[command(name = "analyze", about = "Analyze one news article and print the result as JSON")]
struct Args {
    /// Article URL
    url: String,

    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override models.path from the configuration
    #[arg(long, value_name = "DIR")]
    models_dir: Option<PathBuf>,

    /// Print the plain-text rendering instead of JSON
    #[arg(long)]
    text: bool,

    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let _ = dotenv::dotenv();

    let config = app::load_config(args.config).await?;
    let analyzer = app::build_analyzer(&config, args.models_dir.as_deref())?;

    let record = analyzer
        .analyze(&args.url)
        .await
        .with_context(|| format!("analysis of {} failed", args.url))?;

    if args.text {
        println!("{}", record.render());
    } else {
        println!("{}", serde_json::to_string_pretty(&record)?);
    }
    Ok(())
}
