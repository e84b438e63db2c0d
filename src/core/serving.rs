use regex::Regex;
use std::sync::LazyLock;

use crate::error::DietError;
use crate::models::entry::{BASELINE_GRAMS, DiaryEntry};
use crate::models::nutrient::{MacroTotals, NutrientVector};

static SERVING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+\.?\d*|\.\d+)\s*(?i:g|grams?)?$").expect("serving pattern is valid")
});

/// Parse user serving input such as `150`, `150g` or `37.5 g`.
///
/// Blank, zero and non-numeric input is rejected rather than treated as a
/// zero serving.
pub fn parse_serving(input: &str) -> Result<f64, DietError> {
    let invalid = || DietError::InvalidServingSize(input.to_string());
    let caps = SERVING_RE.captures(input.trim()).ok_or_else(invalid)?;
    let grams: f64 = caps[1].parse().map_err(|_| invalid())?;
    valid_grams(Some(grams)).ok_or_else(invalid)
}

/// A serving size is usable only when present, finite and positive.
pub fn valid_grams(grams: Option<f64>) -> Option<f64> {
    grams.filter(|g| g.is_finite() && *g > 0.0)
}

/// Scale a per-100 g vector to `grams`. `None` if the size is invalid.
pub fn scale(v: &NutrientVector, grams: f64) -> Option<MacroTotals> {
    let grams = valid_grams(Some(grams))?;
    Some(MacroTotals::from(v).scaled(grams / BASELINE_GRAMS))
}

/// Absolute nutrients for one logged entry. `None` if the entry is invalid.
pub fn scale_entry(e: &DiaryEntry) -> Option<MacroTotals> {
    let grams = valid_grams(e.quantity_grams)?;
    let base = MacroTotals {
        calories: e.calories,
        protein: e.protein,
        carbs: e.carbs,
        fat: e.fat,
        fiber: e.fiber,
    };
    Some(base.scaled(grams / BASELINE_GRAMS))
}

pub fn round_calories(v: f64) -> f64 {
    v.round()
}

pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

pub fn round_grams(v: f64) -> f64 {
    v.round()
}

/// Display form of slot/day totals: integer kcal, one-decimal grams.
pub fn display_totals(t: &MacroTotals) -> MacroTotals {
    MacroTotals {
        calories: round_calories(t.calories),
        protein: round1(t.protein),
        carbs: round1(t.carbs),
        fat: round1(t.fat),
        fiber: round1(t.fiber),
    }
}

/// Display form of a single entry: integer kcal and grams.
pub fn display_entry(t: &MacroTotals) -> MacroTotals {
    MacroTotals {
        calories: round_calories(t.calories),
        protein: round_grams(t.protein),
        carbs: round_grams(t.carbs),
        fat: round_grams(t.fat),
        fiber: round_grams(t.fiber),
    }
}
