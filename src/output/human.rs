use colored::Colorize;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use crate::core::aggregate::DaySummary;
use crate::core::backfill::BackfillReport;
use crate::core::energy::EnergyTargets;
use crate::core::lookup::FoodItem;
use crate::core::month::MonthSummary;
use crate::core::serving::{display_entry, display_totals, scale_entry};
use crate::models::entry::{DayLog, DiaryEntry, MealSlot};
use crate::models::nutrient::MacroTotals;

fn macro_cells(t: &MacroTotals) -> Vec<Cell> {
    [t.calories, t.protein, t.carbs, t.fat, t.fiber]
        .iter()
        .map(|v| Cell::new(v).set_alignment(CellAlignment::Right))
        .collect()
}

fn serving(e: &DiaryEntry) -> String {
    match e.quantity_grams {
        Some(g) => format!("{} g", g),
        None => "?".to_string(),
    }
}

/// One-line description of an entry with its scaled totals.
pub fn format_entry(slot: MealSlot, index: usize, e: &DiaryEntry) -> String {
    let name = match e.brand.as_deref() {
        Some(b) => format!("{} ({})", e.display_name(), b),
        None => e.display_name().to_string(),
    };
    match scale_entry(e).map(|t| display_entry(&t)) {
        Some(t) => format!(
            "{}[{}] {} | {} | {} kcal, P {} g, C {} g, F {} g",
            slot,
            index,
            name,
            serving(e),
            t.calories,
            t.protein,
            t.carbs,
            t.fat
        ),
        None => format!("{}[{}] {} | invalid serving, excluded", slot, index, name),
    }
}

/// Day view: one row per entry, a subtotal row per slot, and the day total.
pub fn format_day(day: &DayLog, summary: &DaySummary) -> String {
    if day.is_empty() {
        return format!("No entries for {}", day.date);
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED).set_header(vec![
        "#", "Food", "Serving", "kcal", "Protein", "Carbs", "Fat", "Fiber",
    ]);

    for s in &summary.slots {
        let entries = day.meals.slot(s.slot);
        if entries.is_empty() {
            continue;
        }
        for (i, e) in entries.iter().enumerate() {
            let mut row = vec![
                Cell::new(format!("{}[{}]", s.slot, i)),
                Cell::new(e.display_name()),
                Cell::new(serving(e)),
            ];
            match scale_entry(e) {
                Some(t) => row.extend(macro_cells(&display_entry(&t))),
                None => row.push(Cell::new("excluded")),
            }
            table.add_row(row);
        }
        let mut subtotal = vec![
            Cell::new(""),
            Cell::new(format!("{} total", s.slot)),
            Cell::new(""),
        ];
        subtotal.extend(macro_cells(&display_totals(&s.totals)));
        table.add_row(subtotal);
    }

    let mut total = vec![Cell::new(""), Cell::new("Day total"), Cell::new("")];
    total.extend(macro_cells(&display_totals(&summary.total)));
    table.add_row(total);

    format!("=== {} ===\n{}", day.date, table)
}

pub fn format_energy(t: &EnergyTargets) -> String {
    format!(
        "BMR: {} kcal | TDEE: {} kcal | Daily goal: {} kcal",
        t.bmr.round(),
        t.tdee.round(),
        t.daily_calorie_goal.round()
    )
}

/// Month summary with the three day counters highlighted.
pub fn format_month(m: &MonthSummary) -> String {
    let mut out = format!(
        "=== {}-{:02} ({} days) ===\n",
        m.year, m.month, m.days_in_month
    );
    out.push_str(&format!(
        "Goal: {} kcal/day | BMR: {} kcal/day\n",
        m.daily_calorie_goal.round(),
        m.bmr.round()
    ));
    out.push_str(&format!(
        "Consumed: {} of {} kcal needed\n",
        m.total_calories_consumed.round(),
        m.total_calories_needed.round()
    ));
    out.push_str(&format!(
        "Deficit: {} achieved, {} planned\n",
        m.calories_deficit_achieved.round(),
        m.calories_deficit_needed.round()
    ));
    out.push_str(&format!(
        "Within range: {} | Above goal: {} | Below BMR: {}",
        m.days_within_range.to_string().green(),
        m.days_above_required.to_string().yellow(),
        m.days_below_bmr.to_string().red()
    ));
    out
}

pub fn format_search(items: &[FoodItem]) -> String {
    if items.is_empty() {
        return "No products found".to_string();
    }
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Code", "Name", "Brand", "kcal/100g", "P", "C", "F",
        ]);
    for item in items {
        let t = display_totals(&MacroTotals::from(&item.nutrients));
        let mut row = vec![
            Cell::new(item.code.as_deref().unwrap_or("-")),
            Cell::new(item.name.as_deref().unwrap_or("(unnamed)")),
            Cell::new(item.brand.as_deref().unwrap_or("")),
        ];
        row.extend(macro_cells(&t).into_iter().take(4));
        table.add_row(row);
    }
    table.to_string()
}

pub fn format_backfill(r: &BackfillReport) -> String {
    if r.qualified == 0 {
        return format!("Nothing to backfill ({} entries checked)", r.examined);
    }
    format!(
        "Backfill: {} of {} entries patched, {} skipped, {} failed",
        r.patched, r.qualified, r.skipped, r.failed
    )
}
