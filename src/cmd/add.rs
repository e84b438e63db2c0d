use anyhow::Result;
use chrono::NaiveDate;
use serde_json::json;

use nutrilog::core::backfill::BackfillOptions;
use nutrilog::core::lookup;
use nutrilog::core::serving::{display_entry, parse_serving, scale_entry};
use nutrilog::error::DietError;
use nutrilog::external::{OpenFoodFactsClient, ProductSource};
use nutrilog::models::config::Config;
use nutrilog::models::entry::{DiaryEntry, MealSlot};
use nutrilog::output;
use nutrilog::output::human;

pub enum FoodInput {
    Barcode(String),
    Manual {
        name: String,
        brand: Option<String>,
        calories: f64,
        protein: f64,
        carbs: f64,
        fat: f64,
        fiber: f64,
    },
}

pub async fn run(
    slot: MealSlot,
    food: FoodInput,
    grams: &str,
    date: Option<NaiveDate>,
    human_flag: bool,
) -> Result<()> {
    let config = Config::load()?;
    let grams = parse_serving(grams)?;
    let date = super::day(date);
    let source = OpenFoodFactsClient::new(&config.product_source)?;

    let entry = match food {
        FoodInput::Barcode(code) => lookup::lookup_barcode(&source, &code)
            .await
            .ok_or(DietError::ProductNotFound)?
            .to_entry(grams),
        FoodInput::Manual {
            name,
            brand,
            calories,
            protein,
            carbs,
            fat,
            fiber,
        } => {
            let mut e = DiaryEntry::new(Some(name));
            e.brand = brand;
            e.calories = calories;
            e.protein = protein;
            e.carbs = carbs;
            e.fat = fat;
            e.fiber = fiber;
            e.quantity_grams = Some(grams);
            e
        }
    };

    let options = BackfillOptions {
        prefer_fresh_calories: config.backfill.prefer_fresh_calories,
    };
    let backfill_source: Option<&dyn ProductSource> =
        config.backfill.enabled.then_some(&source as &dyn ProductSource);

    let (ledger, task) = super::open_ledger(date)?;
    let outcome = lookup::add_food(&ledger, backfill_source, slot, entry, options).await?;
    let day = ledger.snapshot().await?;
    super::close_ledger(ledger, task).await?;

    // Backfill may have corrected the entry after the add was confirmed.
    let entry = day
        .meals
        .slot(slot)
        .iter()
        .find(|e| e.id == outcome.added.entry.id)
        .unwrap_or(&outcome.added.entry);
    let index = day.position(slot, &entry.id).unwrap_or(outcome.added.index);

    if human_flag {
        println!("Added {}", human::format_entry(slot, index, entry));
    } else {
        let out = output::success(
            "add",
            json!({
                "date": date.to_string(),
                "slot": slot,
                "index": index,
                "entry": entry,
                "totals": scale_entry(entry).map(|t| display_entry(&t)),
                "backfill": outcome.backfill,
            }),
        );
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}
