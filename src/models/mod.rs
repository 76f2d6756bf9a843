//! Data models for the product caching layer
//!
//! This module defines the typed payloads exchanged with the backend API.

pub mod product;

// Re-export commonly used types
pub use product::Product;
