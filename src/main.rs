mod cli;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use spindle::config::SpindleConfig;

#[derive(Parser)]
#[command(name = "spindle", version, about = "Rotating review batches over a content catalogue")]
struct Cli {
    /// Config file (defaults to ~/.spindle/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the content directory and reconcile it into the catalogue
    Scan {
        /// Directory to scan instead of the configured one
        dir: Option<PathBuf>,
    },
    /// List stored categories
    Categories,
    /// Show the next batch of each recently reviewed category
    Recent {
        #[arg(long)]
        json: bool,
    },
    /// Show the next batch of a category without counting it
    Batch {
        category_id: u32,
        #[arg(long)]
        json: bool,
    },
    /// Count the next batch of a category as reviewed
    Review {
        category_id: u32,
        #[arg(long)]
        json: bool,
    },
    /// Show a single item
    Item { category_id: u32, item_id: u32 },
    /// Show catalogue statistics
    Stats,
    /// Export the catalogue as JSON to stdout
    Export,
    /// Import a catalogue from a JSON export
    Import { file: PathBuf },
    /// Check database health
    Doctor,
    /// Delete the whole catalogue
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => SpindleConfig::load_from(path)?,
        None => SpindleConfig::load()?,
    };

    // Log to stderr so stdout stays clean for --json and export output.
    let filter = EnvFilter::try_new(&config.general.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Scan { dir } => cli::scan::scan(&config, dir).await?,
        Command::Categories => cli::categories::categories(&config)?,
        Command::Recent { json } => cli::batch::recent(&config, json)?,
        Command::Batch { category_id, json } => cli::batch::batch(&config, category_id, json)?,
        Command::Review { category_id, json } => cli::batch::review(&config, category_id, json)?,
        Command::Item {
            category_id,
            item_id,
        } => cli::batch::item(&config, category_id, item_id)?,
        Command::Stats => cli::stats::stats(&config)?,
        Command::Export => cli::export::export(&config)?,
        Command::Import { file } => cli::import::import(&config, &file)?,
        Command::Doctor => cli::doctor::doctor(&config)?,
        Command::Reset => cli::reset::reset(&config)?,
    }

    Ok(())
}
