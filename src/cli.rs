use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

use nutrilog::models::entry::MealSlot;

#[derive(Parser)]
#[command(
    name = "nutrilog",
    version,
    about = "Diet diary with barcode lookup and monthly calorie reconciliation"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as human-readable text instead of JSON
    #[arg(long = "human", short = 'H', global = true)]
    pub human: bool,

    /// Override date (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub date: Option<NaiveDate>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize profile and data directory
    Init {
        /// Skip interactive setup, use defaults
        #[arg(long)]
        skip: bool,
    },

    /// Add a food to a meal, by barcode or by hand
    Add {
        /// Meal slot: breakfast, lunch, dinner or snack
        slot: MealSlot,

        /// Product barcode to look up
        #[arg(long, conflicts_with = "name", required_unless_present = "name")]
        code: Option<String>,

        /// Food name for a manual entry
        #[arg(long, requires = "calories")]
        name: Option<String>,

        /// Brand for a manual entry
        #[arg(long, requires = "name")]
        brand: Option<String>,

        /// kcal per 100 g
        #[arg(long)]
        calories: Option<f64>,

        /// Protein per 100 g
        #[arg(long)]
        protein: Option<f64>,

        /// Carbohydrates per 100 g
        #[arg(long)]
        carbs: Option<f64>,

        /// Fat per 100 g
        #[arg(long)]
        fat: Option<f64>,

        /// Fiber per 100 g
        #[arg(long)]
        fiber: Option<f64>,

        /// Serving size, e.g. 150 or 150g (default 100)
        #[arg(long, default_value = "100")]
        grams: String,
    },

    /// Search the product database
    Search {
        /// Free-text query
        query: String,

        /// Maximum number of results
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },

    /// Show the day's meals with totals
    Show,

    /// Change the serving size of an entry
    Edit {
        slot: MealSlot,

        /// Position within the slot, as listed by `show`
        index: usize,

        /// New serving size, e.g. 150 or 150g
        #[arg(long)]
        grams: String,
    },

    /// Remove an entry
    Remove {
        slot: MealSlot,

        /// Position within the slot, as listed by `show`
        index: usize,
    },

    /// Monthly calorie reconciliation
    Month {
        /// Month to summarize (YYYY-MM); defaults to the month of --date or today
        #[arg(long)]
        month: Option<String>,
    },

    /// BMR, TDEE and daily calorie goal from the profile
    Energy,

    /// Re-fetch nutrients for the day's entries that are missing macros
    Backfill,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set a config value
    Set {
        /// Config key (e.g. weight_kg, activity_level, backfill.enabled)
        key: String,
        /// Config value
        value: String,
    },
}
