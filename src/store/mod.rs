//! Product Store Module
//!
//! The orchestrating store and its key/payload types.

mod key;
mod product_store;

pub use key::{CacheKey, CachedValue};
pub use product_store::{ProductStore, StoreStats};
