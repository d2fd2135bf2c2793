use crate::domain::model::Product;
use crate::domain::ports::{Catalog, ConfigProvider};
use crate::utils::error::{CartError, Result};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

/// Catalog port over the product service's HTTP API
/// (`GET {endpoint}/{productId}`).
pub struct HttpCatalog {
    endpoint: String,
    headers: HashMap<String, String>,
    timeout: Duration,
    client: Client,
}

impl HttpCatalog {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            headers: HashMap::new(),
            timeout: Duration::from_secs(10),
            client: Client::new(),
        }
    }

    pub fn from_config<P: ConfigProvider>(config: &P) -> Self {
        let mut catalog = Self::new(config.catalog_endpoint());
        catalog.timeout = Duration::from_secs(config.request_timeout_secs());
        if let Some(headers) = config.catalog_headers() {
            catalog.headers = headers.clone();
        }
        catalog
    }

    fn product_url(&self, product_id: &str) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), product_id)
    }
}

impl Catalog for HttpCatalog {
    async fn product(&self, product_id: &str) -> Result<Option<Product>> {
        let url = self.product_url(product_id);
        tracing::debug!("Fetching product from catalog: {}", url);

        let mut request = self.client.get(&url).timeout(self.timeout);
        for (key, value) in &self.headers {
            request = request.header(key, value);
        }

        let response = request.send().await?;
        tracing::debug!("Catalog response status: {}", response.status());

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(CartError::CatalogDataError {
                message: format!(
                    "catalog returned status {} for product {}",
                    response.status(),
                    product_id
                ),
            });
        }

        let mut product: Product = response.json().await?;

        // 目錄寫入端不保證總量與各尺寸數量一致，在邊界重算一次，
        // 讓核心永遠看不到不一致的資料
        if !product.size_quantities.is_empty() {
            product.stock = product
                .size_quantities
                .iter()
                .map(|sq| sq.quantity)
                .fold(0u32, u32::saturating_add);
        }

        Ok(Some(product))
    }
}
