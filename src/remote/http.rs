//! HTTP product source
//!
//! Thin reqwest client for the backend products API. Endpoint shape is
//! `GET {base}/products` for the collection and `GET {base}/products/{id}`
//! for a single product.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::debug;

use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::models::Product;
use crate::remote::ProductSource;

// == HTTP Remote Store ==
/// Production [`ProductSource`] backed by a pooled reqwest client.
#[derive(Debug, Clone)]
pub struct HttpRemoteStore {
    client: Client,
    base_url: String,
}

impl HttpRemoteStore {
    /// Builds a client from configuration.
    ///
    /// A trailing slash on the base URL is tolerated; the request timeout
    /// covers the whole call including body download.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .build()
            .map_err(StoreError::from_request)?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Issues one GET and enforces the success-status contract.
    async fn get(&self, url: &str) -> Result<Response> {
        debug!(%url, "requesting backend resource");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(StoreError::from_request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Fetch {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl ProductSource for HttpRemoteStore {
    async fn fetch_all(&self) -> Result<Vec<Product>> {
        let url = self.endpoint("products");
        let response = self.get(&url).await?;
        response
            .json::<Vec<Product>>()
            .await
            .map_err(StoreError::from_request)
    }

    async fn fetch_one(&self, id: &str) -> Result<Product> {
        let url = self.endpoint(&format!("products/{id}"));
        let response = self.get(&url).await?;
        response
            .json::<Product>()
            .await
            .map_err(StoreError::from_request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_base(base: &str) -> HttpRemoteStore {
        let config = Config {
            api_base_url: base.to_string(),
            ..Config::default()
        };
        HttpRemoteStore::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let store = store_with_base("http://localhost:4000/api");
        assert_eq!(
            store.endpoint("products"),
            "http://localhost:4000/api/products"
        );
        assert_eq!(
            store.endpoint("products/p1"),
            "http://localhost:4000/api/products/p1"
        );
    }

    #[test]
    fn test_trailing_slash_is_tolerated() {
        let store = store_with_base("http://localhost:4000/api/");
        assert_eq!(
            store.endpoint("products"),
            "http://localhost:4000/api/products"
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_a_network_error() {
        // reserved TEST-NET address, nothing listens there
        let config = Config {
            api_base_url: "http://192.0.2.1:9".to_string(),
            request_timeout: 1,
            ..Config::default()
        };
        let store = HttpRemoteStore::new(&config).unwrap();

        let result = store.fetch_all().await;
        assert!(matches!(result, Err(StoreError::Network(_))));
    }
}
