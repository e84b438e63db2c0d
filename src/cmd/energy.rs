use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use serde_json::json;

use nutrilog::core::energy;
use nutrilog::models::config::Config;
use nutrilog::output;
use nutrilog::output::human;

pub fn run(date: Option<NaiveDate>, human_flag: bool) -> Result<()> {
    let config = Config::load()?;
    let profile = config.energy_profile(super::day(date).year())?;
    let targets = energy::targets(&profile)?;

    if human_flag {
        println!("{}", human::format_energy(&targets));
    } else {
        let out = output::success("energy", json!({ "profile": profile, "targets": targets }));
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}
