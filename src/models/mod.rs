pub mod config;
pub mod entry;
pub mod nutrient;
pub mod product;
pub mod profile;

pub use entry::{DayLog, DiaryEntry, EntryPatch, MealSlot};
pub use nutrient::{MacroTotals, NutrientVector};
pub use product::{ProductRecord, ProductResponse};
pub use profile::UserEnergyProfile;
