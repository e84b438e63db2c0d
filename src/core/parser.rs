use serde_json::Value;
use thiserror::Error;

use crate::models::nutrient::NutrientVector;
use crate::models::product::{Nutriments, ProductRecord, ProductResponse};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("product not found")]
    ProductNotFound,
}

/// Parse the nutrient vector out of a by-barcode response.
pub fn parse_response(response: &ProductResponse) -> Result<NutrientVector, ParseError> {
    parse_product(response.product.as_ref())
}

/// Normalize a product record into per-100 g nutrients.
///
/// Only a missing product body is an error; missing nutrients read as 0.
pub fn parse_product(product: Option<&ProductRecord>) -> Result<NutrientVector, ParseError> {
    let product = product.ok_or(ParseError::ProductNotFound)?;
    Ok(product
        .nutriments
        .as_ref()
        .map(parse_nutriments)
        .unwrap_or_default())
}

pub fn parse_nutriments(n: &Nutriments) -> NutrientVector {
    NutrientVector {
        calories: pick(&n.energy_kcal_100g, &n.energy_kcal),
        protein: pick(&n.proteins_100g, &n.proteins),
        carbs: pick(&n.carbohydrates_100g, &n.carbohydrates),
        sugar: pick(&n.sugars_100g, &n.sugars),
        fat: pick(&n.fat_100g, &n.fat),
        saturated_fat: pick(&n.saturated_fat_100g, &n.saturated_fat),
        fiber: pick(&n.fiber_100g, &n.fiber),
        cholesterol: pick(&n.cholesterol_100g, &n.cholesterol),
        sodium: pick(&n.sodium_100g, &n.sodium),
    }
}

/// Suffixed field first, then unsuffixed, then 0.
fn pick(per_100g: &Option<Value>, plain: &Option<Value>) -> f64 {
    per_100g
        .as_ref()
        .filter(|v| !v.is_null())
        .or(plain.as_ref())
        .map(coerce)
        .unwrap_or(0.0)
}

fn coerce(v: &Value) -> f64 {
    let n = match v {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() && n > 0.0 { n } else { 0.0 }
}
