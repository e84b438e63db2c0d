//! Wire schema for product-database records.
//!
//! Every field is optional because the upstream database is crowd-sourced:
//! products routinely lack names, images or whole nutrient groups, and
//! numeric nutrient values arrive as either JSON numbers or strings. Values
//! are kept raw here and coerced by [`crate::core::parser`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response of a by-barcode lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductResponse {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub status_verbose: Option<String>,
    #[serde(default)]
    pub product: Option<ProductRecord>,
}

impl ProductResponse {
    pub fn not_found(code: &str) -> Self {
        Self {
            code: Some(code.to_string()),
            status_verbose: Some("product not found".to_string()),
            product: None,
        }
    }
}

/// Response of a free-text search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub count: Option<Value>,
    #[serde(default)]
    pub products: Vec<ProductRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub brands: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub nutriments: Option<Nutriments>,
}

/// Nutrient fields, each in a `_100g` and an unsuffixed variant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Nutriments {
    #[serde(rename = "energy-kcal_100g", default, skip_serializing_if = "Option::is_none")]
    pub energy_kcal_100g: Option<Value>,
    #[serde(rename = "energy-kcal", default, skip_serializing_if = "Option::is_none")]
    pub energy_kcal: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proteins_100g: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proteins: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbohydrates_100g: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbohydrates: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugars_100g: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugars: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat_100g: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat: Option<Value>,
    #[serde(rename = "saturated-fat_100g", default, skip_serializing_if = "Option::is_none")]
    pub saturated_fat_100g: Option<Value>,
    #[serde(rename = "saturated-fat", default, skip_serializing_if = "Option::is_none")]
    pub saturated_fat: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber_100g: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cholesterol_100g: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cholesterol: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sodium_100g: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sodium: Option<Value>,
}
