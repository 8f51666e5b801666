//! Data models
//!
//! In-memory catalogs and the daily log store.

mod daily_log;
mod error;
mod exercise;
mod food;
mod food_catalog;
mod nutrition;

pub use daily_log::{DailyLog, EntryId, FoodLogEntry, DEFAULT_CALORIE_GOAL, DEFAULT_WEIGHT_KG};
pub use error::{ModelError, ModelResult};
pub use exercise::{Exercise, ExerciseCatalog, ExerciseEntry, ExerciseId};
pub use food::{Food, FoodId, FoodKind, Ingredient};
pub use food_catalog::FoodCatalog;
pub use nutrition::Nutrition;
