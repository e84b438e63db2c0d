use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::ledger::{LedgerHandle, NutrientPatch, PatchOutcome};
use crate::core::parser;
use crate::error::DietError;
use crate::external::ProductSource;
use crate::models::entry::{DayLog, DiaryEntry, EntryPatch};
use crate::models::nutrient::NutrientVector;

#[derive(Debug, Clone, Copy, Default)]
pub struct BackfillOptions {
    /// Overwrite the stored calories with the freshly parsed value.
    pub prefer_fresh_calories: bool,
}

/// An entry needs backfill when it has a source code and a calorie figure
/// but no macros at all. Zero calories alongside zero macros is taken as a
/// genuinely empty food and left alone.
pub fn needs_backfill(e: &DiaryEntry) -> bool {
    let has_code = e.code.as_deref().is_some_and(|c| !c.trim().is_empty());
    has_code && e.protein == 0.0 && e.carbs == 0.0 && e.fat == 0.0 && e.calories > 0.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "detail")]
pub enum BackfillOutcome {
    Patched(PatchOutcome),
    ProductNotFound,
    NoMacros,
    Failed(String),
    LedgerClosed,
}

#[derive(Debug, Default, Serialize)]
pub struct BackfillReport {
    pub date: Option<NaiveDate>,
    pub examined: usize,
    pub qualified: usize,
    pub patched: usize,
    /// Fetch or transport errors.
    pub failed: usize,
    /// Unknown product, no macros upstream, or the entry vanished.
    pub skipped: usize,
}

impl BackfillReport {
    fn record(&mut self, outcome: &BackfillOutcome) {
        match outcome {
            BackfillOutcome::Patched(PatchOutcome::Applied | PatchOutcome::AppliedLocally) => {
                self.patched += 1
            }
            BackfillOutcome::Failed(_) => self.failed += 1,
            BackfillOutcome::Patched(PatchOutcome::Stale)
            | BackfillOutcome::ProductNotFound
            | BackfillOutcome::NoMacros
            | BackfillOutcome::LedgerClosed => self.skipped += 1,
        }
    }
}

fn build_patch(v: &NutrientVector, options: BackfillOptions) -> EntryPatch {
    EntryPatch {
        calories: (options.prefer_fresh_calories && v.calories > 0.0).then_some(v.calories),
        protein: Some(v.protein),
        carbs: Some(v.carbs),
        fat: Some(v.fat),
        fiber: Some(v.fiber),
        quantity_grams: None,
    }
}

/// Re-fetch one entry's product and hand corrected macros to the ledger.
///
/// Never fails: every problem is logged and reported as an outcome.
pub async fn backfill_entry(
    source: &dyn ProductSource,
    ledger: &LedgerHandle,
    entry_id: &str,
    index: usize,
    code: &str,
    options: BackfillOptions,
) -> BackfillOutcome {
    let response = match source.product_by_code(code).await {
        Ok(r) => r,
        Err(e) => {
            warn!(code, error = %e, "backfill fetch failed");
            return BackfillOutcome::Failed(e.to_string());
        }
    };
    let nutrients = match parser::parse_response(&response) {
        Ok(v) => v,
        Err(e) => {
            debug!(code, error = %e, "backfill source has no product");
            return BackfillOutcome::ProductNotFound;
        }
    };
    if !nutrients.has_macros() {
        debug!(code, "backfill source has no macros either");
        return BackfillOutcome::NoMacros;
    }

    let patch = NutrientPatch {
        entry_id: entry_id.to_string(),
        issued_index: index,
        patch: build_patch(&nutrients, options),
    };
    match ledger.apply_patch(patch).await {
        Some(outcome) => {
            debug!(code, ?outcome, "backfill patch applied");
            BackfillOutcome::Patched(outcome)
        }
        None => {
            debug!(code, "ledger closed before backfill finished");
            BackfillOutcome::LedgerClosed
        }
    }
}

/// Backfill every qualifying entry of the ledger's day, one at a time in
/// slot-then-index order. One entry failing does not stop the rest.
pub async fn run_pass(
    source: &dyn ProductSource,
    ledger: &LedgerHandle,
    options: BackfillOptions,
) -> BackfillReport {
    let mut report = BackfillReport {
        date: Some(ledger.date()),
        ..BackfillReport::default()
    };
    let day = match ledger.snapshot().await {
        Ok(day) => day,
        Err(e) => {
            debug!(error = %e, "skipping backfill; ledger unavailable");
            return report;
        }
    };

    report.examined = day.entries().count();
    let candidates: Vec<(usize, String, String)> = day
        .entries()
        .filter(|(_, _, e)| needs_backfill(e))
        .filter_map(|(_, i, e)| e.code.clone().map(|c| (i, e.id.clone(), c)))
        .collect();
    report.qualified = candidates.len();

    for (index, id, code) in &candidates {
        let outcome = backfill_entry(source, ledger, id, *index, code, options).await;
        report.record(&outcome);
        if outcome == BackfillOutcome::LedgerClosed {
            break;
        }
    }

    if report.qualified > 0 {
        info!(
            date = %day.date,
            qualified = report.qualified,
            patched = report.patched,
            failed = report.failed,
            "backfill pass finished"
        );
    }
    report
}

/// Load the ledger's day, backfilling it first when a source is given.
///
/// The returned log reflects any corrections the pass applied.
pub async fn load_day(
    ledger: &LedgerHandle,
    source: Option<&dyn ProductSource>,
    options: BackfillOptions,
) -> Result<(DayLog, Option<BackfillReport>), DietError> {
    let Some(source) = source else {
        return Ok((ledger.snapshot().await?, None));
    };
    let report = run_pass(source, ledger, options).await;
    let day = ledger.snapshot().await?;
    Ok((day, Some(report)))
}
