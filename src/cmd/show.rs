use anyhow::Result;
use chrono::NaiveDate;
use serde_json::{Value, json};

use nutrilog::core::aggregate::summarize_day;
use nutrilog::core::backfill::{self, BackfillOptions};
use nutrilog::core::serving::{display_entry, display_totals, scale_entry};
use nutrilog::external::{OpenFoodFactsClient, ProductSource};
use nutrilog::models::config::Config;
use nutrilog::output;
use nutrilog::output::human;

pub async fn run(date: Option<NaiveDate>, human_flag: bool) -> Result<()> {
    let config = Config::load()?;
    let date = super::day(date);
    let client = OpenFoodFactsClient::new(&config.product_source)?;
    let source: Option<&dyn ProductSource> =
        config.backfill.enabled.then_some(&client as &dyn ProductSource);
    let options = BackfillOptions {
        prefer_fresh_calories: config.backfill.prefer_fresh_calories,
    };

    let (ledger, task) = super::open_ledger(date)?;
    let loaded = backfill::load_day(&ledger, source, options).await;
    super::close_ledger(ledger, task).await?;
    let (day, report) = loaded?;
    let summary = summarize_day(&day);

    if human_flag {
        println!("{}", human::format_day(&day, &summary));
        if let Some(r) = report.as_ref().filter(|r| r.qualified > 0) {
            println!("{}", human::format_backfill(r));
        }
        return Ok(());
    }

    let slots: Vec<Value> = summary
        .slots
        .iter()
        .map(|s| {
            let entries: Vec<Value> = day
                .meals
                .slot(s.slot)
                .iter()
                .enumerate()
                .map(|(i, e)| {
                    json!({
                        "index": i,
                        "entry": e,
                        "totals": scale_entry(e).map(|t| display_entry(&t)),
                    })
                })
                .collect();
            json!({
                "slot": s.slot,
                "entries": entries,
                "excluded": s.excluded,
                "totals": display_totals(&s.totals),
            })
        })
        .collect();

    let out = output::success(
        "show",
        json!({
            "date": date.to_string(),
            "slots": slots,
            "total": display_totals(&summary.total),
            "backfill": report,
        }),
    );
    println!("{}", serde_json::to_string(&out)?);
    Ok(())
}
