//! Cache key and payload types for the product store.

use std::fmt;
use std::sync::Arc;

use crate::error::{Result, StoreError};
use crate::models::Product;

// == Cache Key ==
/// Key space of the product cache: the whole-collection sentinel plus one
/// key per product identifier.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    /// The full product collection
    AllProducts,
    /// A single product, by backend identifier
    Product(String),
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::AllProducts => write!(f, "all_products"),
            CacheKey::Product(id) => write!(f, "product_{id}"),
        }
    }
}

// == Cached Value ==
/// Payloads stored under a [`CacheKey`], shared behind `Arc` so cache reads
/// and coalesced deliveries never deep-copy product data.
#[derive(Debug, Clone)]
pub enum CachedValue {
    /// A single product
    Product(Arc<Product>),
    /// The full product collection
    Products(Arc<Vec<Product>>),
}

impl CachedValue {
    /// Extracts the single-product payload.
    ///
    /// The store only ever files a `Product` payload under a product key,
    /// so a mismatch is an internal error rather than a caller mistake.
    pub fn into_product(self) -> Result<Arc<Product>> {
        match self {
            CachedValue::Product(product) => Ok(product),
            CachedValue::Products(_) => Err(StoreError::Internal(
                "collection payload filed under a product key".to_string(),
            )),
        }
    }

    /// Extracts the collection payload.
    pub fn into_products(self) -> Result<Arc<Vec<Product>>> {
        match self {
            CachedValue::Products(products) => Ok(products),
            CachedValue::Product(_) => Err(StoreError::Internal(
                "product payload filed under the collection key".to_string(),
            )),
        }
    }
}
