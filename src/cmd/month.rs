use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use serde_json::json;

use nutrilog::core::{energy, month};
use nutrilog::db::{Database, DiaryStore};
use nutrilog::error::DietError;
use nutrilog::models::config::Config;
use nutrilog::output;
use nutrilog::output::human;

/// Parse `YYYY-MM`.
fn parse_month(s: &str) -> Result<(i32, u32), DietError> {
    let invalid = || DietError::InvalidInput(format!("invalid month: {} (expected YYYY-MM)", s));
    let (y, m) = s.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = y.parse().map_err(|_| invalid())?;
    let month: u32 = m.parse().map_err(|_| invalid())?;
    month::days_in_month(year, month).ok_or_else(invalid)?;
    Ok((year, month))
}

pub fn run(month_arg: Option<&str>, date: Option<NaiveDate>, human_flag: bool) -> Result<()> {
    let (year, month) = match month_arg {
        Some(s) => parse_month(s)?,
        None => {
            let d = super::day(date);
            (d.year(), d.month())
        }
    };

    let config = Config::load()?;
    let targets = energy::targets(&config.energy_profile(year)?)?;
    let db = Database::open(&Config::db_path())?;
    let logs = db.month_logs(year, month)?;
    let summary = month::reconcile(
        &logs,
        year,
        month,
        targets.daily_calorie_goal,
        targets.bmr,
    )?;

    if human_flag {
        println!("{}", human::format_month(&summary));
    } else {
        let out = output::success("month", json!({ "summary": summary, "targets": targets }));
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}
