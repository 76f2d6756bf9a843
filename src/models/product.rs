//! Product payload model
//!
//! Typed representation of the backend's product resource. Deserialization
//! happens once at the network boundary; a body that does not match this
//! shape is a parse failure rather than a value with missing fields.

use serde::{Deserialize, Serialize};

// == Product ==
/// A single product as served by the backend API.
///
/// Identifier, name and price are required; the remaining fields default
/// when the backend omits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Backend identifier, also used as the cache key for this product
    #[serde(rename = "_id")]
    pub id: String,
    /// Display name
    pub name: String,
    /// Long-form description
    #[serde(default)]
    pub description: String,
    /// List price before discount
    pub price: f64,
    /// Discount in percent, 0 when the product is not on sale
    #[serde(default)]
    pub discount_percentage: f64,
    /// Units in stock
    #[serde(default)]
    pub stock: u32,
    /// Primary image URL
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Additional media URLs
    #[serde(default)]
    pub media: Vec<String>,
    /// Average review rating
    #[serde(default)]
    pub rating: f64,
    /// Identifiers of reviews attached to this product
    #[serde(default)]
    pub reviews: Vec<String>,
    /// Category slug
    #[serde(default)]
    pub category: Option<String>,
}

impl Product {
    /// Effective price after applying the discount percentage.
    pub fn discounted_price(&self) -> f64 {
        self.price * (1.0 - self.discount_percentage / 100.0)
    }
}
