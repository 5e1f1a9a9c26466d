//! Gallery CLI - command-line browser for the artwork catalog.
//!
//! Pages through the listing or a search, prints one line per artwork and
//! optionally resolves every image through the shared cache.

use anyhow::{Context, Result};
use clap::Parser;
use gallery_core::{
    ArtworkSummary, CatalogClient, CatalogSession, DetailLoader, FetchOutcome, GalleryConfig,
    ImageCache, ImageLoader, ImageOutcome, SessionError,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "gallery")]
#[command(about = "Browse and search the artwork catalog")]
struct Args {
    /// Search term (browses the full listing when omitted)
    #[arg(short, long)]
    query: Option<String>,

    /// Maximum number of pages to load
    #[arg(short, long, default_value = "1")]
    pages: u32,

    /// Items per page (defaults to the configured page size)
    #[arg(long)]
    page_size: Option<u32>,

    /// Only print artworks whose date contains this text
    #[arg(short, long)]
    year: Option<String>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Resolve and decode each artwork's image
    #[arg(long)]
    fetch_images: bool,

    /// Print the full record for one artwork id and exit
    #[arg(long)]
    detail: Option<i64>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    let mut config = match &args.config {
        Some(path) => GalleryConfig::from_json_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GalleryConfig::default(),
    };
    if let Some(page_size) = args.page_size {
        config = config.with_page_size(page_size);
    }
    config.validate()?;

    let client = Arc::new(CatalogClient::from_config(&config)?);
    info!("Using catalog at {}", client.base_url());

    if let Some(id) = args.detail {
        return print_detail(client, id).await;
    }

    let session = CatalogSession::from_config(client, &config);
    let first = match args.query.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => session.apply_search_term(term).await,
        _ => session.refresh().await,
    };
    report_failure(&first)?;

    for _ in 1..args.pages {
        match session.request_more().await {
            FetchOutcome::Skipped => break,
            outcome => report_failure(&outcome)?,
        }
    }

    if let Some(year) = &args.year {
        session.set_year_filter(year.as_str());
    }

    let state = session.state();
    let items = session.filtered_items();
    info!(
        "Loaded {} artworks ({} shown), more available: {}",
        state.items.len(),
        items.len(),
        state.has_more
    );

    let loader = if args.fetch_images {
        let cache = Arc::new(ImageCache::from_config(&config));
        Some(ImageLoader::from_config(&config, cache)?)
    } else {
        None
    };

    for item in &items {
        print_summary(item);
        if let Some(loader) = &loader {
            match loader.load(item).await {
                ImageOutcome::Loaded(image) => println!("    image {}x{}", image.width, image.height),
                ImageOutcome::Unavailable => println!("    no image"),
            }
        }
    }

    if let Some(loader) = &loader {
        let stats = loader.cache().stats();
        println!(
            "cache: {} entries, {} bytes (limits {} / {}), {} hits, {} misses, {} evictions",
            stats.entries,
            stats.total_cost_bytes,
            stats.max_entries,
            stats.max_cost_bytes,
            stats.hits,
            stats.misses,
            stats.evictions
        );
    }

    Ok(())
}

fn print_summary(item: &ArtworkSummary) {
    println!(
        "{:>8}  {}  {}  {}",
        item.id,
        item.title,
        item.artist_name(),
        item.display_year()
    );
}

/// Turn a failed fetch into an error for `main`, logging whether a retry
/// can help.
fn report_failure(outcome: &FetchOutcome) -> Result<()> {
    if let FetchOutcome::Failed(err) = outcome {
        warn!("Catalog fetch failed ({:?}){}", err.kind, retry_hint(err));
        anyhow::bail!("{}", err.message);
    }
    Ok(())
}

fn retry_hint(err: &SessionError) -> &'static str {
    if err.is_retryable() {
        ", run again to retry"
    } else {
        ""
    }
}

async fn print_detail(client: Arc<CatalogClient>, id: i64) -> Result<()> {
    let loader = DetailLoader::new(client);
    let Some(detail) = loader.load(id).await else {
        let message = loader
            .state()
            .last_error
            .map(|e| e.message)
            .unwrap_or_else(|| "no record returned".to_string());
        anyhow::bail!("artwork {}: {}", id, message);
    };

    print_summary(&detail.summary);
    for (label, value) in [
        ("Medium", &detail.medium_display),
        ("Dimensions", &detail.dimensions),
        ("Credit", &detail.credit_line),
        ("Provenance", &detail.provenance_text),
    ] {
        if let Some(value) = value {
            println!("    {}: {}", label, value);
        }
    }
    Ok(())
}
