//! Exercise model
//!
//! Named exercises with a burn rate in calories per kilogram of body weight
//! per hour, and the per-date entries that log minutes spent on them.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{check_name, ModelError, ModelResult};
use super::EntryId;

/// Position of an exercise in its catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExerciseId(pub(crate) usize);

impl fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An exercise definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    pub calories_per_kg_per_hour: f64,
}

impl Exercise {
    pub fn new(name: impl Into<String>, calories_per_kg_per_hour: f64) -> Self {
        Self {
            name: name.into(),
            calories_per_kg_per_hour,
        }
    }

    /// Calories burned = rate × weight_kg × hours
    pub fn calories_burned(&self, weight_kg: f64, minutes: f64) -> f64 {
        self.calories_per_kg_per_hour * weight_kg * (minutes / 60.0)
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} cal/kg/hr)", self.name, self.calories_per_kg_per_hour)
    }
}

/// Exercises with case-insensitively unique names, in insertion order
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExerciseCatalog {
    exercises: Vec<Exercise>,
}

impl ExerciseCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an exercise unless one with the same name (ignoring case) exists.
    ///
    /// A duplicate is silently ignored and the id of the existing exercise is
    /// returned. Names that cannot be stored are rejected with
    /// [`ModelError::InvalidName`].
    pub fn add(&mut self, exercise: Exercise) -> ModelResult<ExerciseId> {
        check_name(&exercise.name)?;
        if let Some(existing) = self.find_by_name(&exercise.name) {
            debug!(exercise = %exercise.name, "Ignoring duplicate exercise");
            return Ok(existing);
        }
        self.exercises.push(exercise);
        Ok(ExerciseId(self.exercises.len() - 1))
    }

    pub fn find_by_name(&self, name: &str) -> Option<ExerciseId> {
        let wanted = name.to_lowercase();
        self.exercises
            .iter()
            .position(|e| e.name.to_lowercase() == wanted)
            .map(ExerciseId)
    }

    pub fn get(&self, id: ExerciseId) -> Option<&Exercise> {
        self.exercises.get(id.0)
    }

    pub fn all(&self) -> impl Iterator<Item = (ExerciseId, &Exercise)> {
        self.exercises
            .iter()
            .enumerate()
            .map(|(i, e)| (ExerciseId(i), e))
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// Change the burn rate of an existing exercise
    pub fn set_rate(&mut self, id: ExerciseId, calories_per_kg_per_hour: f64) -> ModelResult<()> {
        let exercise = self
            .exercises
            .get_mut(id.0)
            .ok_or(ModelError::UnknownExercise(id))?;
        exercise.calories_per_kg_per_hour = calories_per_kg_per_hour;
        Ok(())
    }
}

/// Minutes spent on one exercise, stored under a date in the daily log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    pub id: EntryId,
    pub exercise: ExerciseId,
    pub minutes: f64,
}

impl ExerciseEntry {
    /// Calories burned at the given body weight; zero if the exercise is unknown
    pub fn calories_burned(&self, catalog: &ExerciseCatalog, weight_kg: f64) -> f64 {
        catalog
            .get(self.exercise)
            .map(|e| e.calories_burned(weight_kg, self.minutes))
            .unwrap_or(0.0)
    }
}
