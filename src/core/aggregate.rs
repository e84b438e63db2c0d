use chrono::NaiveDate;
use serde::Serialize;

use crate::core::serving::scale_entry;
use crate::models::entry::{DayLog, DiaryEntry, MealSlot};
use crate::models::nutrient::MacroTotals;

/// Sum the scaled nutrients of `entries`, skipping entries with an invalid
/// serving size. Repeated foods are counted once per occurrence.
pub fn aggregate_entries(entries: &[DiaryEntry]) -> MacroTotals {
    entries.iter().filter_map(scale_entry).sum()
}

pub fn slot_totals(day: &DayLog, slot: MealSlot) -> MacroTotals {
    aggregate_entries(day.meals.slot(slot))
}

pub fn day_totals(day: &DayLog) -> MacroTotals {
    MealSlot::ALL.iter().map(|s| slot_totals(day, *s)).sum()
}

#[derive(Debug, Serialize)]
pub struct SlotSummary {
    pub slot: MealSlot,
    pub entries: usize,
    pub excluded: usize,
    pub totals: MacroTotals,
}

#[derive(Debug, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub slots: Vec<SlotSummary>,
    pub total: MacroTotals,
}

/// Per-slot and per-day totals for a day.
pub fn summarize_day(day: &DayLog) -> DaySummary {
    let slots: Vec<SlotSummary> = MealSlot::ALL
        .iter()
        .map(|&slot| {
            let entries = day.meals.slot(slot);
            SlotSummary {
                slot,
                entries: entries.len(),
                excluded: entries.iter().filter(|e| scale_entry(e).is_none()).count(),
                totals: aggregate_entries(entries),
            }
        })
        .collect();
    let total = slots.iter().map(|s| s.totals).sum();
    DaySummary {
        date: day.date,
        slots,
        total,
    }
}
