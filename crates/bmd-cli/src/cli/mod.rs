mod commands;
mod progress;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use bmd_core::config;

/// Top-level CLI for the BMD bulk media downloader.
#[derive(Debug, Parser)]
#[command(name = "bmd")]
#[command(about = "BMD: bulk media downloader with skip/resume and bounded concurrency", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Options shared by every download command.
#[derive(Debug, Args)]
pub struct DownloadOpts {
    /// Directory to save downloads into.
    #[arg(long)]
    pub target: PathBuf,

    /// Which extension to download.
    #[arg(long, default_value = "mkv", value_parser = ["mkv", "mp4"])]
    pub ext: String,

    /// Max concurrent downloads (defaults to the config value).
    #[arg(short = 'j', long = "jobs")]
    pub jobs: Option<usize>,

    /// Opaque session cookie attached to each download (e.g. "session=abc").
    #[arg(long)]
    pub cookie: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download URLs found in a CSV/text file.
    File {
        /// Path to the CSV/text file to scan for URLs.
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        opts: DownloadOpts,
    },

    /// Scrape download links from an HTML page and download them.
    Page {
        /// Page URL whose table links will be scraped.
        #[arg(long)]
        url: String,

        #[command(flatten)]
        opts: DownloadOpts,
    },
}

pub async fn run_from_args() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);

    match cli.command {
        CliCommand::File { input, opts } => commands::file::run(&input, &opts, &cfg).await,
        CliCommand::Page { url, opts } => commands::page::run(&url, &opts, &cfg).await,
    }
}
