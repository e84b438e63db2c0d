use anyhow::Result;
use chrono::NaiveDate;
use serde_json::json;

use nutrilog::core::backfill::{self, BackfillOptions};
use nutrilog::external::OpenFoodFactsClient;
use nutrilog::models::config::Config;
use nutrilog::output;
use nutrilog::output::human;

pub async fn run(date: Option<NaiveDate>, human_flag: bool) -> Result<()> {
    let config = Config::load()?;
    let source = OpenFoodFactsClient::new(&config.product_source)?;
    let options = BackfillOptions {
        prefer_fresh_calories: config.backfill.prefer_fresh_calories,
    };

    let (ledger, task) = super::open_ledger(super::day(date))?;
    let report = backfill::run_pass(&source, &ledger, options).await;
    super::close_ledger(ledger, task).await?;

    if human_flag {
        println!("{}", human::format_backfill(&report));
    } else {
        let out = output::success("backfill", json!({ "report": report }));
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}
