//! Storefront Cache - a client-side product caching layer
//!
//! Wraps a storefront products REST API with a TTL-bounded cache and
//! per-key request coalescing, so render bursts requesting the same product
//! issue a single network call.

pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod remote;
pub mod store;
pub mod tasks;

pub use config::Config;
pub use error::{Result, StoreError};
pub use models::Product;
pub use remote::{HttpRemoteStore, ProductSource};
pub use store::{ProductStore, StoreStats};
pub use tasks::spawn_cleanup_task;
