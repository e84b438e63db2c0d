use anyhow::Result;
use chrono::NaiveDate;
use serde_json::json;

use nutrilog::core::ledger::LedgerHandle;
use nutrilog::core::serving::{display_entry, parse_serving, scale_entry};
use nutrilog::error::DietError;
use nutrilog::models::entry::MealSlot;
use nutrilog::output;
use nutrilog::output::human;

/// Translate the positional address the user sees into the entry's id.
async fn resolve(ledger: &LedgerHandle, slot: MealSlot, index: usize) -> Result<String> {
    let day = ledger.snapshot().await?;
    let entry = day
        .meals
        .slot(slot)
        .get(index)
        .ok_or(DietError::EntryNotFound {
            date: day.date,
            slot,
            index,
        })?;
    Ok(entry.id.clone())
}

pub async fn run_edit(
    slot: MealSlot,
    index: usize,
    grams: &str,
    date: Option<NaiveDate>,
    human_flag: bool,
) -> Result<()> {
    let grams = parse_serving(grams)?;
    let date = super::day(date);
    let (ledger, task) = super::open_ledger(date)?;
    let result = match resolve(&ledger, slot, index).await {
        Ok(id) => ledger
            .update_serving(slot, &id, grams)
            .await
            .map_err(anyhow::Error::from),
        Err(e) => Err(e),
    };
    super::close_ledger(ledger, task).await?;
    let entry = result?;

    if human_flag {
        println!("Updated {}", human::format_entry(slot, index, &entry));
    } else {
        let out = output::success(
            "edit",
            json!({
                "date": date.to_string(),
                "slot": slot,
                "index": index,
                "entry": entry,
                "totals": scale_entry(&entry).map(|t| display_entry(&t)),
            }),
        );
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

pub async fn run_remove(
    slot: MealSlot,
    index: usize,
    date: Option<NaiveDate>,
    human_flag: bool,
) -> Result<()> {
    let date = super::day(date);
    let (ledger, task) = super::open_ledger(date)?;
    let result = match resolve(&ledger, slot, index).await {
        Ok(id) => ledger.remove(slot, &id).await.map_err(anyhow::Error::from),
        Err(e) => Err(e),
    };
    super::close_ledger(ledger, task).await?;
    let entry = result?;

    if human_flag {
        println!("Removed {} from {} on {}", entry.display_name(), slot, date);
    } else {
        let out = output::success(
            "remove",
            json!({
                "date": date.to_string(),
                "slot": slot,
                "index": index,
                "entry": entry,
            }),
        );
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}
