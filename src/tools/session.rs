//! Session state
//!
//! One session owns the catalogs, the log store, the data files and the
//! currently selected date. Tools borrow it for the duration of one action.

use chrono::NaiveDate;
use tracing::warn;

use crate::models::{DailyLog, ExerciseCatalog, FoodCatalog};
use crate::store::{DataFiles, StoreResult};

pub struct Session {
    pub(crate) files: DataFiles,
    pub(crate) foods: FoodCatalog,
    pub(crate) exercises: ExerciseCatalog,
    pub(crate) log: DailyLog,
    pub(crate) current_date: NaiveDate,
}

impl Session {
    /// Load foods, then exercises, then the log (which needs both catalogs).
    /// The selected date starts at today.
    pub fn open(files: DataFiles) -> StoreResult<Self> {
        files.ensure_dir()?;
        let (foods, _) = files.load_foods()?;
        let (exercises, _) = files.load_exercises()?;
        let (log, _) = files.load_log(&foods, &exercises)?;

        Ok(Self::with_data(
            files,
            foods,
            exercises,
            log,
            chrono::Local::now().date_naive(),
        ))
    }

    /// Build a session around already-loaded state
    pub fn with_data(
        files: DataFiles,
        foods: FoodCatalog,
        exercises: ExerciseCatalog,
        log: DailyLog,
        current_date: NaiveDate,
    ) -> Self {
        Self {
            files,
            foods,
            exercises,
            log,
            current_date,
        }
    }

    pub fn files(&self) -> &DataFiles {
        &self.files
    }

    pub fn foods(&self) -> &FoodCatalog {
        &self.foods
    }

    pub fn exercises(&self) -> &ExerciseCatalog {
        &self.exercises
    }

    pub fn log(&self) -> &DailyLog {
        &self.log
    }

    pub fn current_date(&self) -> NaiveDate {
        self.current_date
    }

    /// Apply a change to the food catalog and save it. If the change or the
    /// save fails, the catalog is restored so the session is left as it was.
    pub(crate) fn update_foods<T>(
        &mut self,
        change: impl FnOnce(&mut FoodCatalog) -> Result<T, String>,
    ) -> Result<T, String> {
        let previous = self.foods.clone();
        let result = change(&mut self.foods).and_then(|value| self.save_foods().map(|()| value));
        if result.is_err() {
            self.foods = previous;
        }
        result
    }

    /// Same as [`Session::update_foods`] for the exercise catalog
    pub(crate) fn update_exercises<T>(
        &mut self,
        change: impl FnOnce(&mut ExerciseCatalog) -> Result<T, String>,
    ) -> Result<T, String> {
        let previous = self.exercises.clone();
        let result =
            change(&mut self.exercises).and_then(|value| self.save_exercises().map(|()| value));
        if result.is_err() {
            self.exercises = previous;
        }
        result
    }

    /// Same as [`Session::update_foods`] for the daily log
    pub(crate) fn update_log<T>(
        &mut self,
        change: impl FnOnce(&mut DailyLog) -> Result<T, String>,
    ) -> Result<T, String> {
        let previous = self.log.clone();
        let result = change(&mut self.log).and_then(|value| self.save_log().map(|()| value));
        if result.is_err() {
            self.log = previous;
        }
        result
    }

    fn save_foods(&self) -> Result<(), String> {
        self.files.save_foods(&self.foods).map_err(|e| {
            warn!(error = %e, "Reverting food catalog change");
            format!("Failed to save foods: {}", e)
        })
    }

    fn save_exercises(&self) -> Result<(), String> {
        self.files.save_exercises(&self.exercises).map_err(|e| {
            warn!(error = %e, "Reverting exercise catalog change");
            format!("Failed to save exercises: {}", e)
        })
    }

    fn save_log(&self) -> Result<(), String> {
        self.files
            .save_log(&self.log, &self.foods, &self.exercises)
            .map_err(|e| {
                warn!(error = %e, "Reverting log change");
                format!("Failed to save log: {}", e)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_open_loads_all_files() {
        let temp_dir = TempDir::new().unwrap();
        let files = DataFiles::new(temp_dir.path());
        fs::write(files.foods_path(), "b,Apple,95,0.3,25,0.5\nr,Pair,Apple,2\n").unwrap();
        fs::write(files.exercises_path(), "e,Running,7\n").unwrap();
        fs::write(
            files.log_path(),
            "2024,01,01,f,Pair,1\n2024,01,01,e,Running,30\n2024,01,01,w,70\n",
        )
        .unwrap();

        let session = Session::open(files).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(session.foods().len(), 2);
        assert_eq!(session.exercises().len(), 1);
        assert_eq!(session.log().total_calories_for_date(date, session.foods()), 190.0);
        assert_eq!(session.log().weight_for_date(date), 70.0);
    }

    #[test]
    fn test_failed_save_restores_previous_state() {
        let temp_dir = TempDir::new().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut session = Session::with_data(
            DataFiles::new(temp_dir.path().join("missing")),
            FoodCatalog::new(),
            ExerciseCatalog::new(),
            DailyLog::new(),
            date,
        );

        let err = session
            .update_log(|log| {
                log.set_weight_for_date(date, 70.0);
                Ok(())
            })
            .unwrap_err();
        assert!(err.starts_with("Failed to save log"));
        assert_eq!(session.log().weights().count(), 0);

        let err = session
            .update_exercises(|exercises| {
                exercises
                    .add(crate::models::Exercise::new("Running", 7.0))
                    .map_err(|e| e.to_string())
            })
            .unwrap_err();
        assert!(err.starts_with("Failed to save exercises"));
        assert!(session.exercises().is_empty());
    }

    #[test]
    fn test_rejected_change_restores_previous_state() {
        let temp_dir = TempDir::new().unwrap();
        let mut session = Session::open(DataFiles::new(temp_dir.path())).unwrap();
        let err = session
            .update_foods(|foods| {
                foods
                    .add(crate::models::Food::basic("Apple", crate::models::Nutrition::zero()))
                    .map_err(|e| e.to_string())?;
                Err::<(), _>("second step failed".to_string())
            })
            .unwrap_err();
        assert_eq!(err, "second step failed");
        assert!(session.foods().is_empty());
        assert!(!session.files().foods_path().exists());
    }

    #[test]
    fn test_open_creates_missing_data_dir() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("nested").join("data");
        let session = Session::open(DataFiles::new(&dir)).unwrap();
        assert!(dir.is_dir());
        assert!(session.foods().is_empty());
    }
}
