use anyhow::Result;
use std::io::{self, Write};
use std::str::FromStr;

use nutrilog::db::Database;
use nutrilog::models::config::Config;
use nutrilog::models::profile::{ActivityLevel, Gender};

pub fn run(skip: bool) -> Result<()> {
    let mut config = Config::load().unwrap_or_default();

    if !skip {
        println!("nutrilog setup\n");

        config.profile.weight_kg = Some(prompt_parse::<f64>("Current weight (kg)")?);
        config.profile.height_cm = Some(prompt_parse::<f64>("Height (cm)")?);
        config.profile.birth_year = Some(prompt_parse::<i32>("Birth year")?);
        config.profile.gender = Some(prompt_parse::<Gender>("Gender (male/female)")?);
        config.profile.activity_level = prompt_parse::<ActivityLevel>(
            "Activity level (sedentary/light/moderate/active/extra)",
        )?;
        config.profile.weight_change_rate =
            prompt_parse::<f64>("Weekly weight change in kg (e.g. -0.5 to lose)")?;

        config.save()?;
        Database::open(&Config::db_path())?;

        println!("\nSetup complete. Data stored in {:?}", Config::data_dir());
    } else {
        config.save()?;
        println!("Config initialized with defaults at {:?}", Config::path());
    }

    Ok(())
}

fn prompt_string(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut buf = String::new();
    if io::stdin().read_line(&mut buf)? == 0 {
        anyhow::bail!("unexpected end of input");
    }
    Ok(buf.trim().to_string())
}

fn prompt_parse<T: FromStr>(label: &str) -> Result<T> {
    loop {
        let s = prompt_string(label)?;
        match s.parse::<T>() {
            Ok(v) => return Ok(v),
            Err(_) => println!("Invalid value, try again."),
        }
    }
}
