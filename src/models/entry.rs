use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::str::FromStr;
use uuid::Uuid;

/// Baseline quantity that stored nutrient fields are expressed against.
pub const BASELINE_GRAMS: f64 = 100.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealSlot {
    pub const ALL: [MealSlot; 4] = [Self::Breakfast, Self::Lunch, Self::Dinner, Self::Snack];
}

impl std::fmt::Display for MealSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Breakfast => write!(f, "breakfast"),
            Self::Lunch => write!(f, "lunch"),
            Self::Dinner => write!(f, "dinner"),
            Self::Snack => write!(f, "snack"),
        }
    }
}

impl FromStr for MealSlot {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "breakfast" => Ok(Self::Breakfast),
            "lunch" => Ok(Self::Lunch),
            "dinner" => Ok(Self::Dinner),
            "snack" | "snacks" => Ok(Self::Snack),
            _ => anyhow::bail!(
                "invalid meal slot: {} (expected breakfast/lunch/dinner/snack)",
                s
            ),
        }
    }
}

fn default_quantity() -> Option<f64> {
    Some(BASELINE_GRAMS)
}

/// Accepts numbers and numeric strings; blank or non-numeric input means "cleared".
fn lenient_grams<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let v = Option::<Value>::deserialize(d)?;
    Ok(match v {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// One logged food. Nutrient fields are always per 100 g; `quantity_grams`
/// is applied at read time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiaryEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub fiber: f64,
    #[serde(default = "default_quantity", deserialize_with = "lenient_grams")]
    pub quantity_grams: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl DiaryEntry {
    pub fn new(name: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            code: None,
            name,
            brand: None,
            image_url: None,
            calories: 0.0,
            protein: 0.0,
            carbs: 0.0,
            fat: 0.0,
            fiber: 0.0,
            quantity_grams: default_quantity(),
            timestamp: Utc::now(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.code.as_deref())
            .unwrap_or("(unnamed)")
    }

    /// Merge-patch: fields left as `None` in the patch are unchanged.
    pub fn apply(&mut self, patch: &EntryPatch) {
        if let Some(v) = patch.calories {
            self.calories = v;
        }
        if let Some(v) = patch.protein {
            self.protein = v;
        }
        if let Some(v) = patch.carbs {
            self.carbs = v;
        }
        if let Some(v) = patch.fat {
            self.fat = v;
        }
        if let Some(v) = patch.fiber {
            self.fiber = v;
        }
        if let Some(g) = patch.quantity_grams {
            self.quantity_grams = Some(g);
        }
    }
}

/// Partial update for an entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiber: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_grams: Option<f64>,
}

impl EntryPatch {
    pub fn serving(grams: f64) -> Self {
        Self {
            quantity_grams: Some(grams),
            ..Self::default()
        }
    }
}

/// Entries of a day, one ordered list per slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meals {
    #[serde(default)]
    pub breakfast: Vec<DiaryEntry>,
    #[serde(default)]
    pub lunch: Vec<DiaryEntry>,
    #[serde(default)]
    pub dinner: Vec<DiaryEntry>,
    #[serde(default)]
    pub snack: Vec<DiaryEntry>,
}

impl Meals {
    pub fn slot(&self, slot: MealSlot) -> &[DiaryEntry] {
        match slot {
            MealSlot::Breakfast => &self.breakfast,
            MealSlot::Lunch => &self.lunch,
            MealSlot::Dinner => &self.dinner,
            MealSlot::Snack => &self.snack,
        }
    }

    pub fn slot_mut(&mut self, slot: MealSlot) -> &mut Vec<DiaryEntry> {
        match slot {
            MealSlot::Breakfast => &mut self.breakfast,
            MealSlot::Lunch => &mut self.lunch,
            MealSlot::Dinner => &mut self.dinner,
            MealSlot::Snack => &mut self.snack,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayLog {
    pub date: NaiveDate,
    #[serde(default)]
    pub meals: Meals,
}

impl DayLog {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            meals: Meals::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        MealSlot::ALL.iter().all(|s| self.meals.slot(*s).is_empty())
    }

    /// Current position of an entry id within a slot.
    pub fn position(&self, slot: MealSlot, id: &str) -> Option<usize> {
        self.meals.slot(slot).iter().position(|e| e.id == id)
    }

    /// Locate an entry by id across all slots.
    pub fn locate(&self, id: &str) -> Option<(MealSlot, usize)> {
        MealSlot::ALL
            .iter()
            .find_map(|s| self.position(*s, id).map(|i| (*s, i)))
    }

    /// All entries in slot-then-index order.
    pub fn entries(&self) -> impl Iterator<Item = (MealSlot, usize, &DiaryEntry)> {
        MealSlot::ALL.into_iter().flat_map(move |s| {
            self.meals
                .slot(s)
                .iter()
                .enumerate()
                .map(move |(i, e)| (s, i, e))
        })
    }
}
