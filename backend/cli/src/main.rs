mod activity_cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use activitylog_config::{config_dir, config_file_path, load_and_prepare};

#[derive(Parser)]
#[command(name = "activitylog")]
#[command(about = "Per-user message activity log")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.activitylog/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the store and write a config file if none exists
    Init,
    /// Append one message to a user's activity log
    Log {
        #[arg(short, long)]
        user: String,
        #[arg(short, long)]
        message: String,
    },
    /// Show a user's activity inside a trailing window
    Check {
        #[arg(short, long)]
        user: String,
        /// Trailing window such as 90s, 30m, 3h or 2d
        #[arg(short, long)]
        window: Option<String>,
        /// Maximum number of records (oldest first)
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Report store location, schema version and record counts
    Status {
        #[arg(short, long)]
        user: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .unwrap_or_else(|| config_file_path(&config_dir()));
    let config = load_and_prepare(&config_path).await?;

    logging::init_logger(config.log_dir(), config.log_level());

    let output = match cli.command {
        Commands::Init => activity_cmd::init(&config, &config_path).await?,
        Commands::Log { user, message } => activity_cmd::log(&config, &user, &message).await?,
        Commands::Check { user, window, limit } => {
            activity_cmd::check(&config, &user, window.as_deref(), limit).await?
        }
        Commands::Status { user } => activity_cmd::status(&config, user.as_deref()).await?,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
