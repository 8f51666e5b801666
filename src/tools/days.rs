//! Day tools
//!
//! Logging food and exercise against the selected date, recording weight and
//! calorie goals, and building the day summary shown after every action.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use super::validate;
use super::Session;
use crate::models::{EntryId, Nutrition};

/// One food log line for display
#[derive(Debug, Clone, Serialize)]
pub struct FoodEntryView {
    pub id: EntryId,
    pub food: String,
    pub servings: f64,
    pub nutrition: Nutrition,
    pub display: String,
}

/// One exercise log line for display
#[derive(Debug, Clone, Serialize)]
pub struct ExerciseEntryView {
    pub id: EntryId,
    pub exercise: String,
    pub minutes: f64,
    pub calories_burned: f64,
    pub display: String,
}

/// Everything derived for one date
#[derive(Debug, Clone, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub foods: Vec<FoodEntryView>,
    pub exercises: Vec<ExerciseEntryView>,
    pub nutrition_total: Nutrition,
    pub calories_burned: f64,
    pub weight_kg: f64,
    /// True if the weight was recorded on this exact date
    pub weight_recorded: bool,
    pub calorie_goal: f64,
    /// Consumed minus burned
    pub net_calories: f64,
    /// Goal minus net
    pub remaining_calories: f64,
}

impl DaySummary {
    pub fn build(session: &Session, date: NaiveDate) -> Self {
        let foods = &session.foods;
        let exercises = &session.exercises;
        let log = &session.log;

        let food_views: Vec<FoodEntryView> = log
            .entries_for_date(date)
            .into_iter()
            .filter_map(|entry| {
                let food = foods.get(entry.food)?;
                let nutrition = entry.nutrition(foods);
                Some(FoodEntryView {
                    id: entry.id,
                    food: food.name().to_string(),
                    servings: entry.servings,
                    display: format!(
                        "{:.1} x {} ({:.1} cal, {:.1} fat, {:.1} carbs, {:.1} protein)",
                        entry.servings,
                        food.name(),
                        nutrition.calories,
                        nutrition.fat,
                        nutrition.carbs,
                        nutrition.protein
                    ),
                    nutrition,
                })
            })
            .collect();

        let weight_kg = log.weight_for_date(date);
        let exercise_views: Vec<ExerciseEntryView> = log
            .exercises_for_date(date)
            .iter()
            .filter_map(|entry| {
                let exercise = exercises.get(entry.exercise)?;
                Some(ExerciseEntryView {
                    id: entry.id,
                    exercise: exercise.name.clone(),
                    minutes: entry.minutes,
                    calories_burned: entry.calories_burned(exercises, weight_kg),
                    display: format!("{}: {} min", exercise.name, entry.minutes),
                })
            })
            .collect();

        let nutrition_total = log.total_nutrition_for_date(date, foods);
        let calories_burned = log.total_calories_burned_for_date(date, weight_kg, exercises);
        let calorie_goal = log.calorie_goal_for_date(date);
        let net_calories = nutrition_total.calories - calories_burned;

        Self {
            date,
            foods: food_views,
            exercises: exercise_views,
            nutrition_total,
            calories_burned,
            weight_kg,
            weight_recorded: log.weight_on(date).is_some(),
            calorie_goal,
            net_calories,
            remaining_calories: calorie_goal - net_calories,
        }
    }
}

/// Summary for any date without changing the selection
pub fn get_day(session: &Session, date: NaiveDate) -> DaySummary {
    DaySummary::build(session, date)
}

/// Select a different date
pub fn change_date(session: &mut Session, date: NaiveDate) -> DaySummary {
    session.current_date = date;
    DaySummary::build(session, date)
}

/// Log servings of a food on the selected date
pub fn log_food(session: &mut Session, food: &str, servings: f64) -> Result<DaySummary, String> {
    let servings = validate::positive("servings", servings)?;
    let food_id = session
        .foods
        .find_by_name(food.trim())
        .ok_or_else(|| format!("Food '{}' not found", food.trim()))?;

    let date = session.current_date;
    let id = session.update_log(|log| Ok(log.add_food_entry(date, food_id, servings)))?;
    info!(%date, entry = %id, food = food.trim(), servings, "Logged food");
    Ok(DaySummary::build(session, date))
}

/// Log minutes of an exercise on the selected date
pub fn log_exercise(session: &mut Session, exercise: &str, minutes: f64) -> Result<DaySummary, String> {
    let minutes = validate::positive("minutes", minutes)?;
    let exercise_id = session
        .exercises
        .find_by_name(exercise.trim())
        .ok_or_else(|| format!("Exercise '{}' not found", exercise.trim()))?;

    let date = session.current_date;
    let id = session.update_log(|log| Ok(log.add_exercise_entry(date, exercise_id, minutes)))?;
    info!(%date, entry = %id, exercise = exercise.trim(), minutes, "Logged exercise");
    Ok(DaySummary::build(session, date))
}

/// Record body weight for the selected date, replacing any earlier value for it
pub fn set_weight(session: &mut Session, weight_kg: f64) -> Result<DaySummary, String> {
    let weight_kg = validate::positive("weight", weight_kg)?;
    let date = session.current_date;
    session.update_log(|log| {
        log.set_weight_for_date(date, weight_kg);
        Ok(())
    })?;
    info!(%date, weight_kg, "Set weight");
    Ok(DaySummary::build(session, date))
}

/// Record the calorie goal for the selected date, replacing any earlier value for it
pub fn set_calorie_goal(session: &mut Session, calories: f64) -> Result<DaySummary, String> {
    let calories = validate::positive("calorie goal", calories)?;
    let date = session.current_date;
    session.update_log(|log| {
        log.set_calorie_goal_for_date(date, calories);
        Ok(())
    })?;
    info!(%date, calories, "Set calorie goal");
    Ok(DaySummary::build(session, date))
}

/// Delete a food entry by id
pub fn delete_food_entry(session: &mut Session, id: EntryId) -> Result<DaySummary, String> {
    let removed = session.update_log(|log| {
        log.remove_food_entry(id)
            .ok_or_else(|| format!("Food entry {} not found", id))
    })?;
    info!(entry = %id, date = %removed.date, "Deleted food entry");
    Ok(DaySummary::build(session, session.current_date))
}

/// Delete an exercise entry from the selected date
pub fn delete_exercise_entry(session: &mut Session, id: EntryId) -> Result<DaySummary, String> {
    let date = session.current_date;
    session.update_log(|log| {
        log.remove_exercise_entry(date, id)
            .ok_or_else(|| format!("Exercise entry {} not found on {}", id, date))
    })?;
    info!(entry = %id, %date, "Deleted exercise entry");
    Ok(DaySummary::build(session, date))
}
