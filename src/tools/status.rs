//! Status and instructions
//!
//! Runtime status of the service and usage notes for tool callers.

use std::time::Instant;

use serde::Serialize;
use sysinfo::{Pid, ProcessesToUpdate, System};

use super::Session;
use crate::build_info::BuildInfo;

/// Usage notes returned by the logging_instructions tool
pub const LOGGING_INSTRUCTIONS: &str = r#"# Diet Log - Logging Instructions

## Selecting a day
- Every log action applies to the selected date. Use change_date (YYYY-MM-DD) first.
- get_day shows any date without changing the selection.

## Foods
1. list_foods to see what already exists (names are matched ignoring case).
2. add_basic_food with calories, fat, carbs and protein per serving.
3. add_recipe with ingredient names and serving multipliers. Ingredients must
   already exist; recipes may contain other recipes.
4. log_food with a food name and number of servings.

## Exercise
1. list_exercises; add_exercise with calories burned per kg per hour.
2. edit_exercise changes the burn rate of an existing exercise.
3. log_exercise with the exercise name and minutes.
   Burn = rate x weight for the day x minutes / 60.

## Weight and calorie goal
- set_weight (kg) and set_calorie_goal apply to the selected date and carry
  forward to later dates until changed. Defaults: 68 kg and 2000 calories.

## Deleting
- delete_food_entry and delete_exercise_entry take the entry id shown in the
  day summary. Exercise entries are removed from the selected date.

## Notes
- Names cannot contain commas or line breaks.
- Servings, minutes, weight and calorie goal must be greater than 0.
"#;

/// One data file and its size on disk
#[derive(Debug, Clone, Serialize)]
pub struct DataFileStatus {
    pub path: String,
    pub size_bytes: Option<u64>,
}

/// Runtime status of the service
#[derive(Debug, Clone, Serialize)]
pub struct DietLogStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Data information
    pub data_dir: String,
    pub data_files: Vec<DataFileStatus>,
    pub food_count: usize,
    pub recipe_count: usize,
    pub exercise_count: usize,
    pub food_entry_count: usize,
    pub selected_date: String,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    pub fn get_status(&self, session: &Session) -> DietLogStatus {
        let build_info = BuildInfo::current();

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        let recipe_count = session.foods().all().filter(|(_, f)| f.is_recipe()).count();

        DietLogStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            data_dir: session.files().dir().display().to_string(),
            data_files: session
                .files()
                .file_sizes()
                .into_iter()
                .map(|(path, size_bytes)| DataFileStatus { path, size_bytes })
                .collect(),
            food_count: session.foods().len(),
            recipe_count,
            exercise_count: session.exercises().len(),
            food_entry_count: session.log().food_entries().len(),
            selected_date: session.current_date().to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyLog, ExerciseCatalog, Food, FoodCatalog, Nutrition};
    use crate::store::DataFiles;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_status_counts() {
        let dir = TempDir::new().unwrap();
        let mut foods = FoodCatalog::new();
        let apple = foods.add(Food::basic("Apple", Nutrition::new(95.0, 0.3, 25.0, 0.5))).unwrap();
        let mut pair = Food::recipe("Pair");
        pair.add_ingredient(apple, 2.0).unwrap();
        foods.add(pair).unwrap();

        let session = Session::with_data(
            DataFiles::new(dir.path()),
            foods,
            ExerciseCatalog::new(),
            DailyLog::new(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        let status = StatusTracker::new().get_status(&session);
        assert_eq!(status.food_count, 2);
        assert_eq!(status.recipe_count, 1);
        assert_eq!(status.selected_date, "2024-01-01");
        assert_eq!(status.data_files.len(), 3);
        assert!(status.data_files.iter().all(|f| f.size_bytes.is_none()));
    }
}
