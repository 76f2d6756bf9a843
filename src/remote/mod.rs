//! Remote Store Module
//!
//! The network boundary of the caching layer. [`ProductSource`] is the seam
//! the orchestrator fetches through; [`HttpRemoteStore`] is the production
//! implementation talking to the backend REST API.

mod http;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Product;

pub use http::HttpRemoteStore;

// == Product Source ==
/// One network call per invocation, nothing else.
///
/// Implementations perform no retries, no caching and no deduplication;
/// those concerns belong to the orchestrator composing this source.
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Fetches the full product collection.
    async fn fetch_all(&self) -> Result<Vec<Product>>;

    /// Fetches a single product by identifier.
    async fn fetch_one(&self, id: &str) -> Result<Product>;
}
