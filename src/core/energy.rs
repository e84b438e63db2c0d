use serde::Serialize;

use crate::error::DietError;
use crate::models::profile::{Gender, UserEnergyProfile};

/// kcal per kg of body-weight change.
const KCAL_PER_KG: f64 = 7700.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergyTargets {
    pub bmr: f64,
    pub tdee: f64,
    pub daily_calorie_goal: f64,
}

/// Mifflin-St Jeor basal metabolic rate in kcal/day.
pub fn bmr(p: &UserEnergyProfile) -> f64 {
    let offset = match p.gender {
        Gender::Male => 5.0,
        Gender::Female => -161.0,
    };
    10.0 * p.weight_kg + 6.25 * p.height_cm - 5.0 * f64::from(p.age) + offset
}

pub fn tdee(p: &UserEnergyProfile) -> f64 {
    bmr(p) * p.activity_level.factor()
}

/// Validate the profile and derive BMR, TDEE and the daily calorie goal.
///
/// An explicit goal in the profile wins. Otherwise the goal is TDEE shifted
/// by the weekly weight-change rate, never below BMR when losing.
pub fn targets(p: &UserEnergyProfile) -> Result<EnergyTargets, DietError> {
    validate(p)?;
    let bmr = bmr(p);
    let tdee = tdee(p);
    let daily_calorie_goal = match p.daily_calorie_goal {
        Some(goal) => goal,
        None => {
            let adjusted = tdee + p.weight_change_rate * KCAL_PER_KG / 7.0;
            if p.weight_change_rate < 0.0 {
                adjusted.max(bmr)
            } else {
                adjusted
            }
        }
    };
    Ok(EnergyTargets {
        bmr,
        tdee,
        daily_calorie_goal,
    })
}

fn validate(p: &UserEnergyProfile) -> Result<(), DietError> {
    if !(20.0..=400.0).contains(&p.weight_kg) {
        return Err(DietError::InvalidProfile(format!(
            "weight {} kg outside 20-400",
            p.weight_kg
        )));
    }
    if !(100.0..=250.0).contains(&p.height_cm) {
        return Err(DietError::InvalidProfile(format!(
            "height {} cm outside 100-250",
            p.height_cm
        )));
    }
    if !(10..=120).contains(&p.age) {
        return Err(DietError::InvalidProfile(format!(
            "age {} outside 10-120",
            p.age
        )));
    }
    if let Some(goal) = p.daily_calorie_goal
        && !(goal.is_finite() && goal > 0.0)
    {
        return Err(DietError::InvalidProfile(format!(
            "daily calorie goal {} must be positive",
            goal
        )));
    }
    Ok(())
}
