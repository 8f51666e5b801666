//! Exercise tools
//!
//! Listing, adding and editing exercise definitions.

use serde::Serialize;
use tracing::info;

use super::validate;
use super::Session;
use crate::models::Exercise;

/// Exercise summary for listing
#[derive(Debug, Serialize)]
pub struct ExerciseSummary {
    pub name: String,
    pub calories_per_kg_per_hour: f64,
    pub display: String,
}

impl From<&Exercise> for ExerciseSummary {
    fn from(exercise: &Exercise) -> Self {
        Self {
            name: exercise.name.clone(),
            calories_per_kg_per_hour: exercise.calories_per_kg_per_hour,
            display: exercise.to_string(),
        }
    }
}

/// Response for list_exercises
#[derive(Debug, Serialize)]
pub struct ListExercisesResponse {
    pub exercises: Vec<ExerciseSummary>,
    pub total: usize,
}

pub fn list_exercises(session: &Session) -> ListExercisesResponse {
    let exercises: Vec<ExerciseSummary> = session
        .exercises
        .all()
        .map(|(_, e)| ExerciseSummary::from(e))
        .collect();
    let total = exercises.len();
    ListExercisesResponse { exercises, total }
}

/// Add an exercise definition.
///
/// The catalog ignores duplicates silently; this tool checks first so the
/// caller can be told.
pub fn add_exercise(
    session: &mut Session,
    name: &str,
    calories_per_kg_per_hour: f64,
) -> Result<ExerciseSummary, String> {
    let name = validate::name("Exercise", name)?;
    let rate = validate::non_negative("calories per kg per hour", calories_per_kg_per_hour)?;
    if session.exercises.find_by_name(name).is_some() {
        return Err(format!("Exercise '{}' already exists. Cannot add duplicate.", name));
    }

    let exercise = Exercise::new(name, rate);
    let summary = ExerciseSummary::from(&exercise);
    session.update_exercises(|exercises| exercises.add(exercise).map_err(|e| e.to_string()))?;
    info!(exercise = name, rate, "Added exercise");
    Ok(summary)
}

/// Replace the burn rate of an existing exercise
pub fn edit_exercise(
    session: &mut Session,
    name: &str,
    calories_per_kg_per_hour: f64,
) -> Result<ExerciseSummary, String> {
    let rate = validate::non_negative("calories per kg per hour", calories_per_kg_per_hour)?;
    let id = session
        .exercises
        .find_by_name(name.trim())
        .ok_or_else(|| format!("Exercise '{}' not found", name.trim()))?;

    session.update_exercises(|exercises| exercises.set_rate(id, rate).map_err(|e| e.to_string()))?;
    info!(exercise = name.trim(), rate, "Updated exercise");

    session
        .exercises
        .get(id)
        .map(ExerciseSummary::from)
        .ok_or_else(|| format!("Exercise '{}' not found", name.trim()))
}
