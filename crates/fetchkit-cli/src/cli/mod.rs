//! CLI for the FetchKit utilities.

mod commands;
#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use fetchkit_core::config;
use fetchkit_core::http::HttpOptions;
use std::path::PathBuf;

use commands::{run_completions, run_get, run_links, run_ls, run_man};

/// Top-level CLI for the FetchKit utilities.
#[derive(Debug, Parser)]
#[command(name = "fetchkit")]
#[command(about = "FetchKit: directory inventory, file download, and link scraping", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// List the entries of a directory with their sizes.
    Ls {
        /// Directory to inventory.
        dir: PathBuf,
    },

    /// Download a URL to a local file.
    Get {
        /// Direct HTTP/HTTPS URL to download.
        url: String,

        /// Destination path. Defaults to a filename derived from the URL,
        /// in the current directory.
        dest: Option<PathBuf>,

        /// Replace the destination if it already exists.
        #[arg(long)]
        overwrite: bool,

        /// Create the destination's parent directories if missing.
        #[arg(long)]
        make_dir: bool,
    },

    /// Scrape a web page for links containing a file-type substring.
    Links {
        /// Page URL to scrape.
        url: String,

        /// Substring to match against each href (e.g. ".csv").
        file_type: String,
    },

    /// Generate shell completions to stdout.
    Completions {
        /// Target shell.
        shell: Shell,
    },

    /// Render the man page to stdout.
    Man,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        // Load global config early; the network commands build their HTTP
        // options from it.
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let http = HttpOptions::from_config(&cfg);

        match cli.command {
            CliCommand::Ls { dir } => run_ls(&dir),
            CliCommand::Get {
                url,
                dest,
                overwrite,
                make_dir,
            } => run_get(&url, dest, overwrite, make_dir, &http),
            CliCommand::Links { url, file_type } => run_links(&url, &file_type, &http),
            CliCommand::Completions { shell } => run_completions(shell),
            CliCommand::Man => run_man(),
        }
    }
}
