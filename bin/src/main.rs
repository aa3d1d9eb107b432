//! taroko CLI - Taiwan market minute-bar archiver and daily aggregator.

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod display;

#[derive(Parser)]
#[command(name = "taroko")]
#[command(about = "Taiwan market minute-bar archiver and daily aggregator", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Archive directory
    #[arg(long, default_value = "data", global = true)]
    data_dir: PathBuf,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Options shared by the download and daily commands.
#[derive(Args)]
pub(crate) struct DownloadOptions {
    /// Data gateway base URL
    #[arg(long, default_value = taroko_lib::url::DEFAULT_BASE_URL)]
    pub(crate) base_url: String,

    /// Earliest date fetched on a full rebuild (YYYY-MM-DD)
    #[arg(long)]
    pub(crate) earliest: Option<String>,

    /// Daily quota ceiling in bytes
    #[arg(long, default_value_t = taroko_lib::DEFAULT_QUOTA_CEILING)]
    pub(crate) quota_ceiling: u64,

    /// Process only the first N instruments
    #[arg(long)]
    pub(crate) limit: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch missing minute bars for every maintained instrument
    Download {
        #[command(flatten)]
        options: DownloadOptions,
    },

    /// Regenerate every daily archive from its minute archive
    Convert {
        /// Maximum concurrent conversions
        #[arg(long, default_value = "8")]
        parallel: usize,
    },

    /// Run download, then convert
    Daily {
        #[command(flatten)]
        options: DownloadOptions,

        /// Maximum concurrent conversions
        #[arg(long, default_value = "8")]
        parallel: usize,
    },

    /// List the instruments the archive maintains
    List {
        /// Data gateway base URL
        #[arg(long, default_value = taroko_lib::url::DEFAULT_BASE_URL)]
        base_url: String,
    },

    /// Zip the whole data directory into a timestamped backup
    Backup {
        /// Directory the zip is written to
        #[arg(long, default_value = "backups")]
        backup_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // API credentials may live in a local .env file.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Download { options } => {
            commands::download::download(&cli.data_dir, &options, cli.quiet).await
        }
        Commands::Convert { parallel } => {
            commands::convert::convert(&cli.data_dir, parallel, cli.quiet).await
        }
        Commands::Daily { options, parallel } => {
            commands::daily::daily(&cli.data_dir, &options, parallel, cli.quiet).await
        }
        Commands::List { base_url } => {
            commands::list::list_instruments(&cli.data_dir, &base_url).await
        }
        Commands::Backup { backup_dir } => commands::backup::backup(&cli.data_dir, &backup_dir),
    }
}
