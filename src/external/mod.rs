//! Product-data sources.
//!
//! [`ProductSource`] is the seam between the diary core and whatever serves
//! product records. The production implementation talks to Open Food Facts;
//! tests substitute an in-memory source.

pub mod open_food_facts;

use async_trait::async_trait;

use crate::error::DietError;
use crate::models::product::{ProductRecord, ProductResponse};

pub use open_food_facts::OpenFoodFactsClient;

#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Look up a product by barcode. An unknown barcode is a response with
    /// no product body, not an error.
    async fn product_by_code(&self, code: &str) -> Result<ProductResponse, DietError>;

    /// Free-text search returning up to `page_size` candidate records.
    async fn search(&self, query: &str, page_size: u32) -> Result<Vec<ProductRecord>, DietError>;
}
