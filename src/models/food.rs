//! Food model
//!
//! A food is either an atomic item with stored nutrition or a recipe whose
//! nutrition is derived from weighted ingredients. Ingredients refer to other
//! foods by [`FoodId`], an index into the owning [`super::FoodCatalog`].

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{ModelError, ModelResult};
use super::Nutrition;

/// Position of a food in its catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FoodId(pub(crate) usize);

impl fmt::Display for FoodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One recipe ingredient with its serving multiplier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub food: FoodId,
    pub servings: f64,
}

/// Food kind tag for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodKind {
    Basic,
    Recipe,
}

/// An atomic food or a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Food {
    Basic {
        name: String,
        nutrition: Nutrition,
    },
    Recipe {
        name: String,
        ingredients: Vec<Ingredient>,
    },
}

impl Food {
    pub fn basic(name: impl Into<String>, nutrition: Nutrition) -> Self {
        Food::Basic {
            name: name.into(),
            nutrition,
        }
    }

    /// An empty recipe; ingredients are added with [`Food::add_ingredient`]
    pub fn recipe(name: impl Into<String>) -> Self {
        Food::Recipe {
            name: name.into(),
            ingredients: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Food::Basic { name, .. } | Food::Recipe { name, .. } => name,
        }
    }

    pub fn kind(&self) -> FoodKind {
        match self {
            Food::Basic { .. } => FoodKind::Basic,
            Food::Recipe { .. } => FoodKind::Recipe,
        }
    }

    pub fn is_recipe(&self) -> bool {
        matches!(self, Food::Recipe { .. })
    }

    /// Ingredients in insertion order (empty for atomic foods)
    pub fn ingredients(&self) -> &[Ingredient] {
        match self {
            Food::Basic { .. } => &[],
            Food::Recipe { ingredients, .. } => ingredients,
        }
    }

    /// Add an ingredient, or replace its multiplier if already present.
    ///
    /// Ingredient identity is the [`FoodId`], not the name. Atomic foods
    /// reject this with [`ModelError::UnsupportedOperation`]. No cycle check
    /// happens here; use [`super::FoodCatalog::add_ingredient`] for foods that
    /// already live in a catalog.
    pub fn add_ingredient(&mut self, food: FoodId, servings: f64) -> ModelResult<()> {
        match self {
            Food::Basic { name, .. } => Err(ModelError::UnsupportedOperation(format!(
                "cannot add an ingredient to basic food '{}'",
                name
            ))),
            Food::Recipe { ingredients, .. } => {
                match ingredients.iter_mut().find(|i| i.food == food) {
                    Some(existing) => existing.servings = servings,
                    None => ingredients.push(Ingredient { food, servings }),
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Food {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Food::Basic { name, nutrition } => write!(f, "{} ({} cal)", name, nutrition.calories),
            Food::Recipe { name, .. } => write!(f, "{} (Recipe)", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_rejects_ingredients() {
        let mut apple = Food::basic("Apple", Nutrition::new(95.0, 0.3, 25.0, 0.5));
        let err = apple.add_ingredient(FoodId(1), 1.0).unwrap_err();
        assert!(matches!(err, ModelError::UnsupportedOperation(_)));
        assert!(apple.ingredients().is_empty());
    }

    #[test]
    fn test_same_ingredient_replaces_multiplier() {
        let mut bowl = Food::recipe("Fruit Bowl");
        bowl.add_ingredient(FoodId(0), 1.0).unwrap();
        bowl.add_ingredient(FoodId(1), 1.0).unwrap();
        bowl.add_ingredient(FoodId(0), 2.0).unwrap();

        assert_eq!(bowl.ingredients().len(), 2);
        assert_eq!(bowl.ingredients()[0], Ingredient { food: FoodId(0), servings: 2.0 });
    }

    #[test]
    fn test_display() {
        let apple = Food::basic("Pizza Slice", Nutrition::new(298.5, 0.0, 0.0, 0.0));
        assert_eq!(apple.to_string(), "Pizza Slice (298.5 cal)");
        assert_eq!(Food::recipe("Fruit Bowl").to_string(), "Fruit Bowl (Recipe)");
    }
}
