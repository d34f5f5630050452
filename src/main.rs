mod cli;

use clap::Parser;
use cli::{CacheCommands, Cli, Commands};
use subswipe::{suggest, FeedAggregator, FeedConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = FeedConfig::from_env();

    match cli.command {
        Commands::Feed { query, data_saver } => {
            let aggregator = FeedAggregator::connect(config).await?;
            let response = aggregator.load(&query, data_saver).await;
            for (rank, item) in response.items.iter().enumerate() {
                println!(
                    "{:>3}. [{:<5}] {:>6} r/{}  {}",
                    rank + 1,
                    item.kind,
                    item.ups,
                    item.collection,
                    item.url
                );
            }
            if !response.provenance_summary.is_empty() {
                println!("{}", response.provenance_summary);
            }
            if let Some(diagnostic) = response.diagnostic {
                eprintln!("{diagnostic}");
            }
        }
        Commands::Suggest { query } => {
            for name in suggest::filter_suggestions(&query, 6) {
                println!("r/{name}");
            }
        }
        Commands::Cache { command } => {
            let aggregator = FeedAggregator::connect(config).await?;
            match command {
                CacheCommands::Clear { prefix } => {
                    let removed = aggregator.cache().clear(prefix.as_deref()).await?;
                    println!("Removed {removed} cached snapshot(s)");
                }
                CacheCommands::Stats => {
                    let (total, expired) = aggregator.cache().stats().await?;
                    println!("{total} cached snapshot(s), {expired} expired");
                }
            }
        }
    }
    Ok(())
}
