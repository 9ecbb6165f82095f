use std::sync::Arc;

use chrono::NaiveDate;
use clap::Parser;
use tracing::info;

use nh_core::{Credentials, Filters, Result};
use nh_sources::logging::init_logging;
use nh_sources::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about = "Fetch and merge headlines from NewsAPI and The Guardian", long_about = None)]
struct Cli {
    /// Full-text search query
    #[arg(short, long)]
    query: Option<String>,
    /// Category filter (e.g. business, technology, science, health)
    #[arg(long)]
    category: Option<String>,
    /// Source filter (e.g. bbc-news, cnn, reuters)
    #[arg(long)]
    source: Option<String>,
    /// Earliest publication date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Latest publication date (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,
}

// "all" is the dashboard's sentinel for an unset select; treat it the
// same as no filter.
fn opt(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && v != "all")
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut filters = Filters {
        query: opt(cli.query),
        category: opt(cli.category),
        source: opt(cli.source),
        ..Default::default()
    };
    filters.set_from(cli.from)?;
    filters.set_to(cli.to)?;

    let credentials = Credentials::from_env();
    let newsapi = Arc::new(NewsApiSource::new(&credentials));
    let guardian = Arc::new(GuardianSource::new(&credentials));
    let aggregator = Aggregator::new(newsapi, guardian);

    aggregator.apply_filters(filters);
    aggregator.refresh().await;

    let articles = aggregator.articles();
    info!(count = articles.len(), "fetch complete");

    for article in &articles {
        println!(
            "📰 {} — {} ({})",
            article.title, article.source, article.published_at
        );
        if !article.description.is_empty() {
            println!("   {}", article.description);
        }
        println!("   {}", article.url);
    }
    if articles.is_empty() {
        println!("No articles matched the current filters.");
    }

    Ok(())
}
