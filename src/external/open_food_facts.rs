//! Open Food Facts API client.
//!
//! Uses the public read API, which needs no key but asks clients to send an
//! identifying `User-Agent`.
//!
//! - by barcode: `GET {base}/api/v2/product/{code}.json`
//! - search: `GET {base}/cgi/search.pl?search_terms=..&search_simple=1&json=1`

use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

use super::ProductSource;
use crate::error::DietError;
use crate::models::config::ProductSourceConfig;
use crate::models::product::{ProductRecord, ProductResponse, SearchResponse};

const SERVICE: &str = "Open Food Facts";
const MAX_PAGE_SIZE: u32 = 100;

pub struct OpenFoodFactsClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl OpenFoodFactsClient {
    pub fn new(config: &ProductSourceConfig) -> Result<Self, DietError> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DietError::external(SERVICE, e.to_string()))?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Option<T>, DietError> {
        let response = request
            .send()
            .await
            .map_err(|e| DietError::external(SERVICE, e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(DietError::external(
                SERVICE,
                format!(
                    "HTTP {}: {}",
                    status,
                    response.text().await.unwrap_or_default()
                ),
            ));
        }

        response
            .json::<T>()
            .await
            .map(Some)
            .map_err(|e| DietError::external(SERVICE, format!("JSON parse error: {}", e)))
    }
}

#[async_trait]
impl ProductSource for OpenFoodFactsClient {
    async fn product_by_code(&self, code: &str) -> Result<ProductResponse, DietError> {
        let code = code.trim();
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DietError::InvalidInput(format!("invalid barcode: {:?}", code)));
        }

        let url = format!("{}/api/v2/product/{}.json", self.base_url, code);
        debug!(%url, "fetching product");
        let response = self
            .get_json::<ProductResponse>(self.http_client.get(&url))
            .await?;
        Ok(response.unwrap_or_else(|| ProductResponse::not_found(code)))
    }

    async fn search(&self, query: &str, page_size: u32) -> Result<Vec<ProductRecord>, DietError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DietError::InvalidInput(
                "search query cannot be empty".to_string(),
            ));
        }
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(DietError::InvalidInput(format!(
                "page size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        let url = format!("{}/cgi/search.pl", self.base_url);
        debug!(%url, query, page_size, "searching products");
        let page_size = page_size.to_string();
        let request = self.http_client.get(&url).query(&[
            ("search_terms", query),
            ("search_simple", "1"),
            ("action", "process"),
            ("json", "1"),
            ("page_size", page_size.as_str()),
        ]);
        let response = self.get_json::<SearchResponse>(request).await?;
        Ok(response.map(|r| r.products).unwrap_or_default())
    }
}
