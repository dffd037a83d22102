pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::domain::HotPeriod;

#[derive(Parser)]
#[command(name = "archivist")]
#[command(about = "Browse, search and download from archive.org", long_about = None)]
pub struct Cli {
    /// Archive base URL (overrides the config file)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Number of parallel download workers (overrides the config file)
    #[arg(short, long, global = true)]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Folds command-line overrides into the loaded configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(base_url) = &self.base_url {
            config.archive.base_url = base_url.clone();
        }
        if let Some(workers) = self.workers {
            config.download.workers = workers;
        }
        if let Commands::Download { dir: Some(dir), .. } = &self.command {
            config.download.directory = Some(dir.clone());
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the latest uploads grouped by category
    Latest {
        /// Print every category with its items
        #[arg(long)]
        tree: bool,
    },
    /// Browse a category (`latest`, `movies` or `movies/documentary`)
    Category {
        name: String,
        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Search the archive
    Search {
        query: String,
        /// Restrict to a media type (repeatable)
        #[arg(short = 't', long = "type")]
        media_types: Vec<String>,
        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Most downloaded recent items (day, week, month, year)
    Hot { period: HotPeriod },
    /// List the files of an item
    Files { identifier: String },
    /// Download files of an item (all files when none are named)
    Download {
        identifier: String,
        files: Vec<String>,
        /// Destination directory
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Manage favorite items
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Open an item's page in the browser
    Open { identifier: String },
    /// Print an item's thumbnail URL
    Thumbnail { identifier: String },
}

#[derive(Subcommand)]
pub enum FavoritesAction {
    /// List favorites
    List,
    /// Add an item to favorites
    Add { identifier: String },
    /// Remove an item from favorites
    Remove { identifier: String },
}
