//! Storefront Cache - a client-side product caching layer
//!
//! Demo binary: builds the store against the configured backend, fetches
//! the product collection (and a product id passed on the command line),
//! then fetches again to demonstrate the cache hit and prints statistics.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_cache::{spawn_cleanup_task, Config, HttpRemoteStore, ProductStore};

/// Entry point for the storefront cache demo.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the HTTP source and the product store
/// 4. Start the background TTL cleanup task
/// 5. Fetch, refetch and report statistics
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting storefront cache demo");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: api_base_url={}, cache_ttl={}s, request_timeout={}s, cleanup_interval={}s",
        config.api_base_url, config.cache_ttl, config.request_timeout, config.cleanup_interval
    );

    let source = HttpRemoteStore::new(&config).context("failed to build HTTP client")?;
    let store = Arc::new(ProductStore::new(Arc::new(source), &config));
    info!("Product store initialized");

    // Start background cleanup task
    let cleanup_handle = spawn_cleanup_task(Arc::clone(&store), config.cleanup_interval);

    // First pass goes to the network
    let products = store
        .fetch_all_products()
        .await
        .context("failed to fetch product collection")?;
    info!("Fetched {} products", products.len());
    for product in products.iter().take(5) {
        info!(
            "  {} - {} ({:.2})",
            product.id,
            product.name,
            product.discounted_price()
        );
    }

    // Optional product id from the command line
    if let Some(id) = std::env::args().nth(1) {
        let product = store
            .fetch_product_by_id(&id)
            .await
            .with_context(|| format!("failed to fetch product '{id}'"))?;
        info!(
            "Fetched product {}: {} ({:.2})",
            product.id,
            product.name,
            product.discounted_price()
        );
    }

    // Second pass is answered from the cache
    store.fetch_all_products().await?;

    let stats = store.stats().await;
    info!(
        "Stats: hits={}, misses={}, fetches={}, coalesced={}, hit_rate={:.2}",
        stats.cache.hits,
        stats.cache.misses,
        stats.fetches,
        stats.coalesced_waits,
        stats.cache.hit_rate()
    );

    cleanup_handle.abort();
    info!("Demo complete");
    Ok(())
}
