//! Model error types

use thiserror::Error;

use super::{ExerciseId, FoodId};

/// Errors raised by the catalogs and the food model
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("A food named '{0}' already exists")]
    DuplicateName(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Adding '{ingredient}' to '{recipe}' would create a circular reference")]
    CircularReference { recipe: String, ingredient: String },

    #[error("Unknown food id {0}")]
    UnknownFood(FoodId),

    #[error("Unknown exercise id {0}")]
    UnknownExercise(ExerciseId),

    #[error("Invalid name: '{0}'")]
    InvalidName(String),
}

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Names are written as a single comma-separated field, so they must be
/// non-blank and free of commas and line breaks
pub(crate) fn check_name(name: &str) -> ModelResult<()> {
    if name.trim().is_empty() || name.contains([',', '\n', '\r']) {
        return Err(ModelError::InvalidName(name.to_string()));
    }
    Ok(())
}
