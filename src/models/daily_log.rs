//! Daily log store
//!
//! Holds four date-keyed streams: food entries, exercise entries, weight
//! observations and calorie goal observations, and computes the per-date
//! aggregates shown for a selected day.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ExerciseCatalog, ExerciseEntry, ExerciseId, FoodCatalog, FoodId, Nutrition};

/// Body weight used when nothing was recorded on or before a date (kg)
pub const DEFAULT_WEIGHT_KG: f64 = 68.0;

/// Calorie goal used when nothing was recorded on or before a date
pub const DEFAULT_CALORIE_GOAL: f64 = 2000.0;

/// Identity of a log entry, unique within one [`DailyLog`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Servings of one food eaten on a date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodLogEntry {
    pub id: EntryId,
    pub date: NaiveDate,
    pub food: FoodId,
    pub servings: f64,
}

impl FoodLogEntry {
    /// servings × the food's per-serving nutrition
    pub fn nutrition(&self, foods: &FoodCatalog) -> Nutrition {
        foods.nutrition(self.food).unwrap_or_default() * self.servings
    }
}

/// The log store
#[derive(Debug, Clone, Default)]
pub struct DailyLog {
    food_entries: Vec<FoodLogEntry>,
    exercise_entries: BTreeMap<NaiveDate, Vec<ExerciseEntry>>,
    weight_by_date: BTreeMap<NaiveDate, f64>,
    goal_by_date: BTreeMap<NaiveDate, f64>,
    next_id: u64,
}

impl DailyLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> EntryId {
        self.next_id += 1;
        EntryId(self.next_id)
    }

    // ------------------------------------------------------------------
    // Food entries
    // ------------------------------------------------------------------

    /// Append a food entry. Servings are not validated here.
    pub fn add_food_entry(&mut self, date: NaiveDate, food: FoodId, servings: f64) -> EntryId {
        let id = self.allocate_id();
        self.food_entries.push(FoodLogEntry {
            id,
            date,
            food,
            servings,
        });
        id
    }

    /// Food entries logged on exactly `date`, in log order
    pub fn entries_for_date(&self, date: NaiveDate) -> Vec<&FoodLogEntry> {
        self.food_entries.iter().filter(|e| e.date == date).collect()
    }

    pub fn food_entries(&self) -> &[FoodLogEntry] {
        &self.food_entries
    }

    pub fn remove_food_entry(&mut self, id: EntryId) -> Option<FoodLogEntry> {
        let index = self.food_entries.iter().position(|e| e.id == id)?;
        Some(self.food_entries.remove(index))
    }

    pub fn total_nutrition_for_date(&self, date: NaiveDate, foods: &FoodCatalog) -> Nutrition {
        self.entries_for_date(date)
            .into_iter()
            .map(|e| e.nutrition(foods))
            .sum()
    }

    pub fn total_calories_for_date(&self, date: NaiveDate, foods: &FoodCatalog) -> f64 {
        self.total_nutrition_for_date(date, foods).calories
    }

    pub fn total_fat_for_date(&self, date: NaiveDate, foods: &FoodCatalog) -> f64 {
        self.total_nutrition_for_date(date, foods).fat
    }

    pub fn total_carbs_for_date(&self, date: NaiveDate, foods: &FoodCatalog) -> f64 {
        self.total_nutrition_for_date(date, foods).carbs
    }

    pub fn total_protein_for_date(&self, date: NaiveDate, foods: &FoodCatalog) -> f64 {
        self.total_nutrition_for_date(date, foods).protein
    }

    // ------------------------------------------------------------------
    // Exercise entries
    // ------------------------------------------------------------------

    pub fn add_exercise_entry(
        &mut self,
        date: NaiveDate,
        exercise: ExerciseId,
        minutes: f64,
    ) -> EntryId {
        let id = self.allocate_id();
        self.exercise_entries
            .entry(date)
            .or_default()
            .push(ExerciseEntry {
                id,
                exercise,
                minutes,
            });
        id
    }

    pub fn exercises_for_date(&self, date: NaiveDate) -> &[ExerciseEntry] {
        self.exercise_entries
            .get(&date)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Dates with at least one exercise bucket, ascending
    pub fn exercise_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.exercise_entries.keys().copied()
    }

    /// Remove an exercise entry from a date's bucket; empty buckets are dropped
    pub fn remove_exercise_entry(&mut self, date: NaiveDate, id: EntryId) -> Option<ExerciseEntry> {
        let bucket = self.exercise_entries.get_mut(&date)?;
        let index = bucket.iter().position(|e| e.id == id)?;
        let removed = bucket.remove(index);
        if bucket.is_empty() {
            self.exercise_entries.remove(&date);
        }
        Some(removed)
    }

    /// Sum of burns for the date's exercises at the given weight.
    ///
    /// The weight is supplied by the caller, who usually passes
    /// [`DailyLog::weight_for_date`].
    pub fn total_calories_burned_for_date(
        &self,
        date: NaiveDate,
        weight_kg: f64,
        exercises: &ExerciseCatalog,
    ) -> f64 {
        self.exercises_for_date(date)
            .iter()
            .map(|e| e.calories_burned(exercises, weight_kg))
            .sum()
    }

    // ------------------------------------------------------------------
    // Weight and calorie goal observations
    // ------------------------------------------------------------------

    pub fn set_weight_for_date(&mut self, date: NaiveDate, weight_kg: f64) {
        self.weight_by_date.insert(date, weight_kg);
    }

    /// Weight recorded on exactly `date`
    pub fn weight_on(&self, date: NaiveDate) -> Option<f64> {
        self.weight_by_date.get(&date).copied()
    }

    /// Latest weight recorded on or before `date`, else [`DEFAULT_WEIGHT_KG`]
    pub fn weight_for_date(&self, date: NaiveDate) -> f64 {
        latest_on_or_before(&self.weight_by_date, date).unwrap_or(DEFAULT_WEIGHT_KG)
    }

    pub fn weights(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.weight_by_date.iter().map(|(d, w)| (*d, *w))
    }

    pub fn set_calorie_goal_for_date(&mut self, date: NaiveDate, goal: f64) {
        self.goal_by_date.insert(date, goal);
    }

    pub fn calorie_goal_on(&self, date: NaiveDate) -> Option<f64> {
        self.goal_by_date.get(&date).copied()
    }

    /// Latest goal recorded on or before `date`, else [`DEFAULT_CALORIE_GOAL`]
    pub fn calorie_goal_for_date(&self, date: NaiveDate) -> f64 {
        latest_on_or_before(&self.goal_by_date, date).unwrap_or(DEFAULT_CALORIE_GOAL)
    }

    pub fn calorie_goals(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.goal_by_date.iter().map(|(d, g)| (*d, *g))
    }
}

/// Exact match if present, otherwise the value at the greatest earlier date
fn latest_on_or_before(values: &BTreeMap<NaiveDate, f64>, date: NaiveDate) -> Option<f64> {
    values.range(..=date).next_back().map(|(_, v)| *v)
}
