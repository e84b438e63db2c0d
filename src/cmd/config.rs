use anyhow::Result;
use serde_json::json;

use nutrilog::models::config::Config;
use nutrilog::output;

pub fn run_show(human: bool) -> Result<()> {
    let config = Config::load()?;
    if human {
        let toml_str = toml::to_string_pretty(&config)?;
        println!("{}", toml_str);
    } else {
        let out = output::success("config", json!({ "config": config }));
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

/// `none` clears an optional value.
fn optional<T: std::str::FromStr>(value: &str) -> Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if value.eq_ignore_ascii_case("none") {
        Ok(None)
    } else {
        Ok(Some(value.parse()?))
    }
}

pub fn run_set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?;

    match key {
        "weight_kg" | "weight" => config.profile.weight_kg = optional(value)?,
        "height_cm" | "height" => config.profile.height_cm = optional(value)?,
        "birth_year" => config.profile.birth_year = optional(value)?,
        "gender" => {
            config.profile.gender = if value.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(value.parse()?)
            }
        }
        "activity_level" => config.profile.activity_level = value.parse()?,
        "daily_calorie_goal" | "goal" => config.profile.daily_calorie_goal = optional(value)?,
        "weight_change_rate" => config.profile.weight_change_rate = value.parse()?,
        "product_source.base_url" => config.product_source.base_url = value.to_string(),
        "product_source.user_agent" => config.product_source.user_agent = value.to_string(),
        "product_source.timeout_secs" => config.product_source.timeout_secs = value.parse()?,
        "backfill.enabled" => config.backfill.enabled = value.parse()?,
        "backfill.prefer_fresh_calories" => {
            config.backfill.prefer_fresh_calories = value.parse()?
        }
        _ => anyhow::bail!("unknown config key: {}", key),
    }

    config.save()?;
    let out = output::success("config", json!({ "key": key, "value": value }));
    println!("{}", serde_json::to_string(&out)?);
    Ok(())
}
