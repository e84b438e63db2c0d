pub mod add;
pub mod backfill;
pub mod completions;
pub mod config;
pub mod edit;
pub mod energy;
pub mod init;
pub mod month;
pub mod search;
pub mod show;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use tokio::task::JoinHandle;

use nutrilog::core::ledger::{self, LedgerHandle};
use nutrilog::db::{Database, DiaryStore};
use nutrilog::models::config::Config;

/// The day a command acts on: `--date`, or today in local time.
pub fn day(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}

/// Open the diary database and start the ledger for `date`.
pub fn open_ledger(
    date: NaiveDate,
) -> Result<(LedgerHandle, JoinHandle<Box<dyn DiaryStore>>)> {
    let db = Database::open(&Config::db_path())?;
    Ok(ledger::spawn(Box::new(db), date)?)
}

/// Release the handle and wait for the ledger task to drain.
pub async fn close_ledger(
    handle: LedgerHandle,
    task: JoinHandle<Box<dyn DiaryStore>>,
) -> Result<()> {
    handle.shutdown();
    task.await?;
    Ok(())
}
