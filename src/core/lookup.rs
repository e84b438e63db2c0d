use serde::Serialize;
use tracing::{debug, warn};

use crate::core::backfill::{self, BackfillOptions, BackfillOutcome};
use crate::core::ledger::{AddedEntry, LedgerHandle};
use crate::core::parser;
use crate::error::DietError;
use crate::external::ProductSource;
use crate::models::entry::{DiaryEntry, MealSlot};
use crate::models::nutrient::NutrientVector;
use crate::models::product::ProductRecord;

/// A product resolved from the source, nutrients per 100 g.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodItem {
    pub code: Option<String>,
    pub name: Option<String>,
    pub brand: Option<String>,
    pub image_url: Option<String>,
    pub nutrients: NutrientVector,
}

impl FoodItem {
    fn from_record(record: &ProductRecord, nutrients: NutrientVector) -> Self {
        Self {
            code: record.code.clone(),
            name: record.product_name.clone().filter(|s| !s.trim().is_empty()),
            brand: record.brands.clone().filter(|s| !s.trim().is_empty()),
            image_url: record.image_url.clone(),
            nutrients,
        }
    }

    /// Build a diary entry for this food. Nutrients stay at the 100 g
    /// baseline; `quantity_grams` is applied when totals are read.
    pub fn to_entry(&self, quantity_grams: f64) -> DiaryEntry {
        let mut e = DiaryEntry::new(self.name.clone());
        e.code = self.code.clone();
        e.brand = self.brand.clone();
        e.image_url = self.image_url.clone();
        e.calories = self.nutrients.calories;
        e.protein = self.nutrients.protein;
        e.carbs = self.nutrients.carbs;
        e.fat = self.nutrients.fat;
        e.fiber = self.nutrients.fiber;
        e.quantity_grams = Some(quantity_grams);
        e
    }
}

/// Resolve a barcode. Unknown products and fetch errors both yield `None`.
pub async fn lookup_barcode(source: &dyn ProductSource, code: &str) -> Option<FoodItem> {
    let response = match source.product_by_code(code).await {
        Ok(r) => r,
        Err(e) => {
            warn!(code, error = %e, "barcode lookup failed");
            return None;
        }
    };
    match parser::parse_response(&response) {
        Ok(nutrients) => response
            .product
            .as_ref()
            .map(|p| FoodItem::from_record(p, nutrients))
            .map(|mut item| {
                if item.code.is_none() {
                    item.code = Some(code.to_string());
                }
                item
            }),
        Err(e) => {
            debug!(code, error = %e, "barcode not in product database");
            None
        }
    }
}

/// Free-text search. Records with no nutrient data at all are dropped.
///
/// Invalid arguments are reported; upstream failures yield an empty list.
pub async fn search_foods(
    source: &dyn ProductSource,
    query: &str,
    limit: u32,
) -> Result<Vec<FoodItem>, DietError> {
    let records = match source.search(query, limit).await {
        Ok(r) => r,
        Err(e @ DietError::InvalidInput(_)) => return Err(e),
        Err(e) => {
            warn!(query, error = %e, "product search failed");
            return Ok(Vec::new());
        }
    };
    Ok(records
        .iter()
        .filter_map(|r| {
            let nutrients = parser::parse_product(Some(r)).ok()?;
            (!nutrients.is_empty()).then(|| FoodItem::from_record(r, nutrients))
        })
        .collect())
}

/// Result of adding a food: the persisted entry plus the follow-up backfill, if any.
#[derive(Debug, Serialize)]
pub struct AddOutcome {
    pub added: AddedEntry,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backfill: Option<BackfillOutcome>,
}

/// Add an entry, then backfill it if it arrived without macros.
///
/// The add is confirmed by the ledger before any fetch is issued. Passing
/// `None` for `source` skips the backfill step.
pub async fn add_food(
    ledger: &LedgerHandle,
    source: Option<&dyn ProductSource>,
    slot: MealSlot,
    entry: DiaryEntry,
    options: BackfillOptions,
) -> Result<AddOutcome, DietError> {
    let added = ledger.add(slot, entry).await?;
    let backfill = match (source, added.entry.code.as_deref()) {
        (Some(source), Some(code)) if backfill::needs_backfill(&added.entry) => Some(
            backfill::backfill_entry(source, ledger, &added.entry.id, added.index, code, options)
                .await,
        ),
        _ => None,
    };
    Ok(AddOutcome { added, backfill })
}
