//! User actions
//!
//! Every user action goes through [`Session::handle_action`]: it validates,
//! mutates the session, persists what changed, and returns the refreshed
//! summary for the selected date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::days::{self, DaySummary};
use super::foods::{self, IngredientInput};
use super::exercises;
use super::Session;
use crate::models::{EntryId, Nutrition};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    ChangeDate {
        date: NaiveDate,
    },
    AddBasicFood {
        name: String,
        calories: f64,
        fat: f64,
        carbs: f64,
        protein: f64,
    },
    AddRecipe {
        name: String,
        ingredients: Vec<IngredientInput>,
    },
    AddExercise {
        name: String,
        calories_per_kg_per_hour: f64,
    },
    EditExercise {
        name: String,
        calories_per_kg_per_hour: f64,
    },
    LogFood {
        food: String,
        servings: f64,
    },
    LogExercise {
        exercise: String,
        minutes: f64,
    },
    SetWeight {
        weight_kg: f64,
    },
    SetCalorieGoal {
        calories: f64,
    },
    DeleteFoodEntry {
        id: EntryId,
    },
    DeleteExerciseEntry {
        id: EntryId,
    },
}

impl Session {
    /// Apply one action and return the summary of the selected date.
    ///
    /// This is the entry point for every mutating tool. A rejected action,
    /// including one whose save fails, leaves the session unchanged.
    pub fn handle_action(&mut self, action: Action) -> Result<DaySummary, String> {
        match action {
            Action::ChangeDate { date } => return Ok(days::change_date(self, date)),
            Action::AddBasicFood {
                name,
                calories,
                fat,
                carbs,
                protein,
            } => {
                foods::add_basic_food(self, &name, Nutrition::new(calories, fat, carbs, protein))?;
            }
            Action::AddRecipe { name, ingredients } => {
                foods::add_recipe(self, &name, &ingredients)?;
            }
            Action::AddExercise {
                name,
                calories_per_kg_per_hour,
            } => {
                exercises::add_exercise(self, &name, calories_per_kg_per_hour)?;
            }
            Action::EditExercise {
                name,
                calories_per_kg_per_hour,
            } => {
                exercises::edit_exercise(self, &name, calories_per_kg_per_hour)?;
            }
            Action::LogFood { food, servings } => return days::log_food(self, &food, servings),
            Action::LogExercise { exercise, minutes } => {
                return days::log_exercise(self, &exercise, minutes)
            }
            Action::SetWeight { weight_kg } => return days::set_weight(self, weight_kg),
            Action::SetCalorieGoal { calories } => return days::set_calorie_goal(self, calories),
            Action::DeleteFoodEntry { id } => return days::delete_food_entry(self, id),
            Action::DeleteExerciseEntry { id } => return days::delete_exercise_entry(self, id),
        }
        Ok(DaySummary::build(self, self.current_date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DataFiles;
    use tempfile::TempDir;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_full_day_flow_and_reload() {
        let dir = TempDir::new().unwrap();
        let mut session = Session::open(DataFiles::new(dir.path())).unwrap();

        let actions = vec![
            Action::ChangeDate { date: day(2024, 1, 1) },
            Action::AddBasicFood {
                name: "Apple".into(),
                calories: 95.0,
                fat: 0.3,
                carbs: 25.0,
                protein: 0.5,
            },
            Action::AddBasicFood {
                name: "Banana".into(),
                calories: 105.0,
                fat: 0.4,
                carbs: 27.0,
                protein: 1.3,
            },
            Action::AddRecipe {
                name: "Fruit Bowl".into(),
                ingredients: vec![
                    IngredientInput { name: "Apple".into(), servings: 2.0 },
                    IngredientInput { name: "Banana".into(), servings: 1.0 },
                ],
            },
            Action::AddExercise {
                name: "Running".into(),
                calories_per_kg_per_hour: 7.0,
            },
            Action::SetWeight { weight_kg: 70.0 },
            Action::ChangeDate { date: day(2024, 1, 5) },
            Action::LogFood { food: "Apple".into(), servings: 1.0 },
            Action::LogFood { food: "Fruit Bowl".into(), servings: 1.0 },
        ];
        for action in actions {
            session.handle_action(action).unwrap();
        }
        let summary = session
            .handle_action(Action::LogExercise {
                exercise: "Running".into(),
                minutes: 30.0,
            })
            .unwrap();

        assert_eq!(summary.date, day(2024, 1, 5));
        assert!((summary.nutrition_total.calories - 390.0).abs() < 1e-9);
        assert!((summary.calories_burned - 245.0).abs() < 1e-9);

        // Everything was persisted along the way
        let mut reopened = Session::open(DataFiles::new(dir.path())).unwrap();
        let summary = reopened
            .handle_action(Action::ChangeDate { date: day(2024, 1, 5) })
            .unwrap();
        assert!((summary.nutrition_total.calories - 390.0).abs() < 1e-9);
        assert!((summary.calories_burned - 245.0).abs() < 1e-9);
        assert_eq!(summary.weight_kg, 70.0);
    }

    #[test]
    fn test_rejected_action_reports_error() {
        let dir = TempDir::new().unwrap();
        let mut session = Session::open(DataFiles::new(dir.path())).unwrap();
        let err = session
            .handle_action(Action::LogFood {
                food: "Pizza".into(),
                servings: 1.0,
            })
            .unwrap_err();
        assert!(err.contains("not found"));
        assert!(session.log().food_entries().is_empty());
    }

    #[test]
    fn test_action_with_failed_save_can_be_retried() {
        let dir = TempDir::new().unwrap();
        let mut session = Session::open(DataFiles::new(dir.path())).unwrap();
        session
            .handle_action(Action::AddBasicFood {
                name: "Apple".into(),
                calories: 95.0,
                fat: 0.3,
                carbs: 25.0,
                protein: 0.5,
            })
            .unwrap();

        session.files = DataFiles::new(dir.path().join("missing"));
        let log_apple = Action::LogFood { food: "Apple".into(), servings: 1.0 };
        assert!(session.handle_action(log_apple.clone()).is_err());
        assert!(session.handle_action(log_apple.clone()).is_err());
        assert!(session.log().food_entries().is_empty());

        session.files = DataFiles::new(dir.path());
        let summary = session.handle_action(log_apple).unwrap();
        assert_eq!(summary.foods.len(), 1);

        let reopened = Session::open(DataFiles::new(dir.path())).unwrap();
        assert_eq!(reopened.log().food_entries().len(), 1);
    }

    #[test]
    fn test_action_json_shape() {
        let action: Action =
            serde_json::from_str(r#"{"action":"set_calorie_goal","calories":1800}"#).unwrap();
        assert_eq!(action, Action::SetCalorieGoal { calories: 1800.0 });

        let action: Action =
            serde_json::from_str(r#"{"action":"change_date","date":"2024-01-05"}"#).unwrap();
        assert_eq!(action, Action::ChangeDate { date: day(2024, 1, 5) });
    }
}
