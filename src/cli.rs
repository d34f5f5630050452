use clap::{Parser, Subcommand};

/// Extensible CLI for debugging and development
#[derive(Parser)]
#[command(name = "subswipe")]
#[command(about = "Load and inspect multi-collection media feeds", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a ranked media feed for comma-separated collections
    Feed {
        /// Collections to load, e.g. "pics,videos,r/funny"
        query: String,
        /// Prefer lower-bandwidth preview URLs for animated images
        #[arg(short, long)]
        data_saver: bool,
    },
    /// Show autocomplete candidates for the last token of a query
    Suggest {
        /// Partial query, e.g. "pics,fu"
        query: String,
    },
    /// Cache maintenance
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Subcommand)]
pub enum CacheCommands {
    /// Remove cached snapshots, optionally only for a collection prefix
    Clear {
        /// Collection-name prefix to match
        #[arg(short, long)]
        prefix: Option<String>,
    },
    /// Show durable snapshot counts
    Stats,
}
