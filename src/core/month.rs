use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::aggregate::day_totals;
use crate::error::DietError;
use crate::models::entry::DayLog;

/// Lower/upper bound of the "within range" band, as fractions of the goal.
const RANGE_LOW: f64 = 0.95;
const RANGE_HIGH: f64 = 1.05;

#[derive(Debug, Clone, Serialize)]
pub struct MonthSummary {
    pub year: i32,
    pub month: u32,
    pub days_in_month: u32,
    pub daily_calorie_goal: f64,
    pub bmr: f64,
    pub daily_calories_consumed: BTreeMap<NaiveDate, f64>,
    pub total_calories_needed: f64,
    pub total_calories_consumed: f64,
    pub calories_deficit_needed: f64,
    pub calories_deficit_achieved: f64,
    pub days_within_range: u32,
    pub days_above_required: u32,
    pub days_below_bmr: u32,
}

/// Number of days in a month, or `None` for an invalid year/month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next.signed_duration_since(first).num_days() as u32)
}

/// Reconcile a month of day logs against the daily goal and BMR.
///
/// Logs outside the target month are ignored. Days without a log count as 0
/// consumed but are never classified as below BMR. The three day counters
/// are evaluated independently of each other.
pub fn reconcile(
    logs: &[DayLog],
    year: i32,
    month: u32,
    daily_calorie_goal: f64,
    bmr: f64,
) -> Result<MonthSummary, DietError> {
    let days = days_in_month(year, month).ok_or_else(|| {
        DietError::InvalidInput(format!("invalid month: {}-{:02}", year, month))
    })?;

    let mut consumed: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for log in logs
        .iter()
        .filter(|l| l.date.year() == year && l.date.month() == month)
    {
        *consumed.entry(log.date).or_insert(0.0) += day_totals(log).calories;
    }

    let days_f = f64::from(days);
    let total_calories_needed = daily_calorie_goal * days_f;
    let total_calories_consumed: f64 = consumed.values().sum();
    let calories_deficit_needed = (daily_calorie_goal - bmr) * days_f;
    let calories_deficit_achieved = total_calories_needed - total_calories_consumed;

    let low = RANGE_LOW * daily_calorie_goal;
    let high = RANGE_HIGH * daily_calorie_goal;
    let mut days_within_range = 0;
    let mut days_above_required = 0;
    let mut days_below_bmr = 0;

    for day in 1..=days {
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| DietError::InvalidInput(format!("invalid day {}", day)))?;
        let c = consumed.get(&date).copied().unwrap_or(0.0);
        if c >= low && c <= high {
            days_within_range += 1;
        }
        if c > daily_calorie_goal {
            days_above_required += 1;
        }
        if c > 0.0 && c < bmr {
            days_below_bmr += 1;
        }
    }

    Ok(MonthSummary {
        year,
        month,
        days_in_month: days,
        daily_calorie_goal,
        bmr,
        daily_calories_consumed: consumed,
        total_calories_needed,
        total_calories_consumed,
        calories_deficit_needed,
        calories_deficit_achieved,
        days_within_range,
        days_above_required,
        days_below_bmr,
    })
}
