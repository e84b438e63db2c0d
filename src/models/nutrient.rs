use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Nutrient content per 100 g of a product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientVector {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub sugar: f64,
    pub fat: f64,
    pub saturated_fat: f64,
    pub fiber: f64,
    pub cholesterol: f64,
    pub sodium: f64,
}

impl NutrientVector {
    pub fn is_empty(&self) -> bool {
        [
            self.calories,
            self.protein,
            self.carbs,
            self.sugar,
            self.fat,
            self.saturated_fat,
            self.fiber,
            self.cholesterol,
            self.sodium,
        ]
        .iter()
        .all(|v| *v == 0.0)
    }

    pub fn has_macros(&self) -> bool {
        self.protein > 0.0 || self.carbs > 0.0 || self.fat > 0.0
    }
}

/// Absolute amounts of the five tracked nutrients for a serving, slot or day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
}

impl MacroTotals {
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            calories: self.calories * factor,
            protein: self.protein * factor,
            carbs: self.carbs * factor,
            fat: self.fat * factor,
            fiber: self.fiber * factor,
        }
    }
}

impl From<&NutrientVector> for MacroTotals {
    fn from(v: &NutrientVector) -> Self {
        Self {
            calories: v.calories,
            protein: v.protein,
            carbs: v.carbs,
            fat: v.fat,
            fiber: v.fiber,
        }
    }
}

impl Add for MacroTotals {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            calories: self.calories + rhs.calories,
            protein: self.protein + rhs.protein,
            carbs: self.carbs + rhs.carbs,
            fat: self.fat + rhs.fat,
            fiber: self.fiber + rhs.fiber,
        }
    }
}

impl AddAssign for MacroTotals {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for MacroTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}
