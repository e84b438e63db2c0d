#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use nutrilog::db::Database;
use nutrilog::error::DietError;
use nutrilog::external::ProductSource;
use nutrilog::models::entry::DiaryEntry;
use nutrilog::models::product::{ProductRecord, ProductResponse};
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use tempfile::TempDir;

/// Create a temporary database for testing.
pub fn setup_db() -> (TempDir, Database) {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("test.db");
    let db = Database::open(&db_path).unwrap();
    (dir, db)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Manual entry with per-100 g calories and macros.
pub fn make_entry(name: &str, calories: f64, protein: f64, grams: f64) -> DiaryEntry {
    let mut e = DiaryEntry::new(Some(name.to_string()));
    e.calories = calories;
    e.protein = protein;
    e.carbs = protein;
    e.fat = protein;
    e.quantity_grams = Some(grams);
    e
}

/// Barcode entry that arrived with calories only.
pub fn calorie_only_entry(code: &str, calories: f64) -> DiaryEntry {
    let mut e = DiaryEntry::new(Some(format!("product {}", code)));
    e.code = Some(code.to_string());
    e.calories = calories;
    e
}

/// Product record in the upstream wire shape.
pub fn product(code: &str, name: &str, kcal: f64, protein: f64, carbs: f64, fat: f64) -> ProductRecord {
    serde_json::from_value(json!({
        "code": code,
        "product_name": name,
        "brands": "Acme",
        "nutriments": {
            "energy-kcal_100g": kcal,
            "proteins_100g": protein,
            "carbohydrates_100g": carbs,
            "fat_100g": fat,
            "fiber_100g": 2.0,
        }
    }))
    .unwrap()
}

/// In-memory product source. Codes listed in `failing` return a transport error.
#[derive(Default)]
pub struct FakeProductSource {
    pub products: HashMap<String, ProductRecord>,
    pub failing: HashSet<String>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeProductSource {
    pub fn with(mut self, record: ProductRecord) -> Self {
        let code = record.code.clone().unwrap_or_default();
        self.products.insert(code, record);
        self
    }

    pub fn failing(mut self, code: &str) -> Self {
        self.failing.insert(code.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProductSource for FakeProductSource {
    async fn product_by_code(&self, code: &str) -> Result<ProductResponse, DietError> {
        self.calls.lock().unwrap().push(code.to_string());
        if self.failing.contains(code) {
            return Err(DietError::external("fake", "connection reset"));
        }
        Ok(match self.products.get(code) {
            Some(p) => ProductResponse {
                code: Some(code.to_string()),
                status_verbose: Some("product found".into()),
                product: Some(p.clone()),
            },
            None => ProductResponse::not_found(code),
        })
    }

    async fn search(&self, query: &str, page_size: u32) -> Result<Vec<ProductRecord>, DietError> {
        if query.trim().is_empty() {
            return Err(DietError::InvalidInput("empty query".into()));
        }
        if self.failing.contains(query) {
            return Err(DietError::external("fake", "timeout"));
        }
        let q = query.to_lowercase();
        let mut hits: Vec<ProductRecord> = self
            .products
            .values()
            .filter(|p| {
                p.product_name
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase().contains(&q))
            })
            .cloned()
            .collect();
        hits.sort_by(|a, b| a.code.cmp(&b.code));
        hits.truncate(page_size as usize);
        Ok(hits)
    }
}
