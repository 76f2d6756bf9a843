//! Product Store Module
//!
//! Orchestrates the cache table, the in-flight tracker and the remote source
//! into the read path UI callers consume. Per key, a request either returns
//! a fresh cached value, coalesces onto an outstanding fetch, or becomes the
//! leader that performs the single network call and populates the cache.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock as StdRwLock};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, CacheTable, Flight, InFlightTracker};
use crate::config::Config;
use crate::error::Result;
use crate::models::Product;
use crate::remote::ProductSource;
use crate::store::{CacheKey, CachedValue};

// == Product View ==
/// Display-facing projection of everything the store has observed.
///
/// Unlike the cache table, the view never expires: it holds the last known
/// value per product so UI callers always have something to render while a
/// refresh is in flight.
#[derive(Debug, Default)]
struct ProductView {
    products: HashMap<String, Arc<Product>>,
    all: Option<Arc<Vec<Product>>>,
}

// == Store Stats ==
/// Snapshot of cache and orchestration counters.
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    /// Cache table counters
    pub cache: CacheStats,
    /// Network fetches issued by leaders
    pub fetches: u64,
    /// Network fetches that ended in an error
    pub fetch_failures: u64,
    /// Callers that coalesced onto an outstanding fetch
    pub coalesced_waits: u64,
    /// Keys with a fetch outstanding right now
    pub in_flight: usize,
}

// == Product Store ==
/// Shared, explicitly constructed product store.
///
/// One instance is built at startup and handed by reference to every
/// consumer; the cache table and in-flight registry live inside it and are
/// mutated by nothing else.
pub struct ProductStore {
    source: Arc<dyn ProductSource>,
    cache: RwLock<CacheTable<CacheKey, CachedValue>>,
    inflight: InFlightTracker<CacheKey, CachedValue>,
    view: StdRwLock<ProductView>,
    fetches: AtomicU64,
    fetch_failures: AtomicU64,
    coalesced_waits: AtomicU64,
}

impl ProductStore {
    // == Constructor ==
    /// Creates a store reading through `source` with the configured TTL.
    pub fn new(source: Arc<dyn ProductSource>, config: &Config) -> Self {
        Self {
            source,
            cache: RwLock::new(CacheTable::new(Duration::from_secs(config.cache_ttl))),
            inflight: InFlightTracker::new(),
            view: StdRwLock::new(ProductView::default()),
            fetches: AtomicU64::new(0),
            fetch_failures: AtomicU64::new(0),
            coalesced_waits: AtomicU64::new(0),
        }
    }

    // == Fetch All Products ==
    /// Returns the product collection, from cache when fresh.
    ///
    /// Concurrent callers share one network call; every caller observes the
    /// same value or the same error.
    pub async fn fetch_all_products(&self) -> Result<Arc<Vec<Product>>> {
        let key = CacheKey::AllProducts;

        if let Some(value) = self.cache.write().await.get(&key) {
            debug!(%key, "cache hit");
            let products = value.into_products()?;
            self.publish_all(&products);
            return Ok(products);
        }

        match self.inflight.join(key.clone()) {
            Flight::Waiter(waiter) => {
                self.coalesced_waits.fetch_add(1, Ordering::Relaxed);
                debug!(%key, "coalescing onto outstanding fetch");
                let products = waiter.outcome().await?.into_products()?;
                self.publish_all(&products);
                Ok(products)
            }
            Flight::Leader(guard) => {
                self.fetches.fetch_add(1, Ordering::Relaxed);
                match self.source.fetch_all().await {
                    Ok(products) => {
                        let products = Arc::new(products);
                        let value = CachedValue::Products(Arc::clone(&products));
                        self.cache.write().await.insert(key, value.clone());
                        self.publish_all(&products);
                        guard.complete(Ok(value));
                        Ok(products)
                    }
                    Err(err) => {
                        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
                        warn!(%key, error = %err, "collection fetch failed");
                        guard.complete(Err(err.clone()));
                        Err(err)
                    }
                }
            }
        }
    }

    // == Fetch Product By Id ==
    /// Returns one product, from cache when fresh.
    ///
    /// Same per-key flow as the collection: fresh cache wins, an
    /// outstanding fetch is joined, otherwise this caller leads exactly one
    /// network call.
    pub async fn fetch_product_by_id(&self, id: &str) -> Result<Arc<Product>> {
        let key = CacheKey::Product(id.to_string());

        if let Some(value) = self.cache.write().await.get(&key) {
            debug!(%key, "cache hit");
            let product = value.into_product()?;
            self.publish_product(&product);
            return Ok(product);
        }

        match self.inflight.join(key.clone()) {
            Flight::Waiter(waiter) => {
                self.coalesced_waits.fetch_add(1, Ordering::Relaxed);
                debug!(%key, "coalescing onto outstanding fetch");
                let product = waiter.outcome().await?.into_product()?;
                self.publish_product(&product);
                Ok(product)
            }
            Flight::Leader(guard) => {
                self.fetches.fetch_add(1, Ordering::Relaxed);
                match self.source.fetch_one(id).await {
                    Ok(product) => {
                        let product = Arc::new(product);
                        let value = CachedValue::Product(Arc::clone(&product));
                        self.cache.write().await.insert(key, value.clone());
                        self.publish_product(&product);
                        guard.complete(Ok(value));
                        Ok(product)
                    }
                    Err(err) => {
                        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
                        warn!(%key, error = %err, "product fetch failed");
                        guard.complete(Err(err.clone()));
                        Err(err)
                    }
                }
            }
        }
    }

    // == View Accessors ==
    /// Last observed value for a product, regardless of cache freshness.
    pub fn get_product(&self, id: &str) -> Option<Arc<Product>> {
        self.view.read().unwrap().products.get(id).cloned()
    }

    /// Last observed product collection.
    pub fn all_products(&self) -> Option<Arc<Vec<Product>>> {
        self.view.read().unwrap().all.clone()
    }

    /// Whether a fetch for this product is outstanding.
    pub fn is_product_loading(&self, id: &str) -> bool {
        self.inflight.contains(&CacheKey::Product(id.to_string()))
    }

    /// Whether a collection fetch is outstanding.
    pub fn all_products_loading(&self) -> bool {
        self.inflight.contains(&CacheKey::AllProducts)
    }

    // == Invalidation ==
    /// Drops every cache entry; the view keeps its last observed values.
    pub async fn clear_cache(&self) {
        self.cache.write().await.clear();
        info!("product cache cleared");
    }

    /// Drops the cache entry for one product, forcing the next read to
    /// refetch. Call sites performing mutations (order placement, stock
    /// changes) use this for the products they touched.
    pub async fn invalidate_product(&self, id: &str) -> bool {
        let removed = self
            .cache
            .write()
            .await
            .remove(&CacheKey::Product(id.to_string()));
        if removed {
            debug!(id, "product cache entry invalidated");
        }
        removed
    }

    /// Drops the cached collection.
    pub async fn invalidate_all_products(&self) -> bool {
        self.cache.write().await.remove(&CacheKey::AllProducts)
    }

    // == Cleanup Expired ==
    /// Removes expired entries from the cache table.
    ///
    /// Returns the number of entries removed.
    pub async fn cleanup_expired(&self) -> usize {
        self.cache.write().await.cleanup_expired()
    }

    // == Stats ==
    /// Returns current cache and orchestration statistics.
    pub async fn stats(&self) -> StoreStats {
        StoreStats {
            cache: self.cache.read().await.stats(),
            fetches: self.fetches.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            coalesced_waits: self.coalesced_waits.load(Ordering::Relaxed),
            in_flight: self.inflight.len(),
        }
    }

    fn publish_product(&self, product: &Arc<Product>) {
        self.view
            .write()
            .unwrap()
            .products
            .insert(product.id.clone(), Arc::clone(product));
    }

    fn publish_all(&self, products: &Arc<Vec<Product>>) {
        self.view.write().unwrap().all = Some(Arc::clone(products));
    }
}

impl std::fmt::Debug for ProductStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductStore")
            .field("in_flight", &self.inflight.len())
            .field("fetches", &self.fetches.load(Ordering::Relaxed))
            .finish()
    }
}
