use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::DietError;
use crate::models::profile::{ActivityLevel, Gender, UserEnergyProfile};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub product_source: ProductSourceConfig,
    #[serde(default)]
    pub backfill: BackfillConfig,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Profile {
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub birth_year: Option<i32>,
    pub gender: Option<Gender>,
    #[serde(default)]
    pub activity_level: ActivityLevel,
    pub daily_calorie_goal: Option<f64>,
    /// kg per week; negative to lose weight.
    #[serde(default)]
    pub weight_change_rate: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductSourceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://world.openfoodfacts.org".to_string()
}
fn default_user_agent() -> String {
    format!("nutrilog/{}", env!("CARGO_PKG_VERSION"))
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for ProductSourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BackfillConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Replace the stored calorie figure with the freshly parsed one.
    #[serde(default)]
    pub prefer_fresh_calories: bool,
}

fn default_true() -> bool {
    true
}

impl Default for BackfillConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            prefer_fresh_calories: false,
        }
    }
}

impl Config {
    /// Load config from the standard path, or return defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::path();
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(toml::from_str(&contents)
                .with_context(|| format!("parsing {}", path.display()))?)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the standard path.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(parent, std::fs::Permissions::from_mode(0o700))?;
            }
        }
        let contents = toml::to_string_pretty(self)?;

        #[cfg(unix)]
        {
            use std::fs::{self, OpenOptions};
            use std::io::Write;
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&path)?;
            file.write_all(contents.as_bytes())?;

            // Pre-existing files keep their old mode through open(); tighten it here.
            let mut perms = file.metadata()?.permissions();
            if perms.mode() & 0o777 != 0o600 {
                perms.set_mode(0o600);
                fs::set_permissions(&path, perms)?;
            }
        }
        #[cfg(not(unix))]
        {
            std::fs::write(&path, contents)?;
        }

        Ok(())
    }

    /// Build the energy profile for `year`, failing on missing or out-of-range fields.
    pub fn energy_profile(&self, year: i32) -> Result<UserEnergyProfile, DietError> {
        let p = &self.profile;
        let missing = |field: &str| DietError::InvalidProfile(format!("{} is not set", field));
        let birth_year = p.birth_year.ok_or_else(|| missing("profile.birth_year"))?;
        let age = year
            .checked_sub(birth_year)
            .and_then(|a| u32::try_from(a).ok())
            .ok_or_else(|| {
                DietError::InvalidProfile(format!("birth year {} is out of range", birth_year))
            })?;
        Ok(UserEnergyProfile {
            weight_kg: p.weight_kg.ok_or_else(|| missing("profile.weight_kg"))?,
            height_cm: p.height_cm.ok_or_else(|| missing("profile.height_cm"))?,
            age,
            gender: p.gender.ok_or_else(|| missing("profile.gender"))?,
            activity_level: p.activity_level,
            daily_calorie_goal: p.daily_calorie_goal,
            weight_change_rate: p.weight_change_rate,
        })
    }

    pub fn data_dir() -> PathBuf {
        if let Ok(home) = std::env::var("NUTRILOG_HOME") {
            return PathBuf::from(home);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".nutrilog")
    }

    pub fn path() -> PathBuf {
        Self::data_dir().join("config.toml")
    }

    pub fn db_path() -> PathBuf {
        Self::data_dir().join("diary.db")
    }
}
