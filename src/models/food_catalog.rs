//! Food catalog
//!
//! Append-only store of every known food. Lookup by name is
//! case-insensitive; recipes reference ingredients by [`FoodId`].

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use super::error::{check_name, ModelError, ModelResult};
use super::{Food, FoodId, Nutrition};

/// All known foods in insertion order
#[derive(Debug, Clone, Default, Serialize)]
pub struct FoodCatalog {
    foods: Vec<Food>,
}

impl FoodCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a food.
    ///
    /// Rejects blank names or names containing commas or line breaks, names
    /// already present (case-insensitive), and recipes whose ingredients are
    /// not already in the catalog. Since every ingredient must exist before
    /// the recipe, a recipe added here can never contain itself.
    pub fn add(&mut self, food: Food) -> ModelResult<FoodId> {
        check_name(food.name())?;
        if self.find_by_name(food.name()).is_some() {
            return Err(ModelError::DuplicateName(food.name().to_string()));
        }
        if let Some(missing) = food
            .ingredients()
            .iter()
            .find(|i| i.food.0 >= self.foods.len())
        {
            return Err(ModelError::UnknownFood(missing.food));
        }

        let id = FoodId(self.foods.len());
        debug!(food = %food.name(), id = id.0, "Added food");
        self.foods.push(food);
        Ok(id)
    }

    /// Case-insensitive exact match; first match wins
    pub fn find_by_name(&self, name: &str) -> Option<FoodId> {
        let wanted = name.to_lowercase();
        self.foods
            .iter()
            .position(|f| f.name().to_lowercase() == wanted)
            .map(FoodId)
    }

    pub fn get(&self, id: FoodId) -> Option<&Food> {
        self.foods.get(id.0)
    }

    /// Foods in insertion order
    pub fn all(&self) -> impl Iterator<Item = (FoodId, &Food)> {
        self.foods.iter().enumerate().map(|(i, f)| (FoodId(i), f))
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }

    /// Nutrient totals per serving, recomputed on every call.
    ///
    /// Recipes sum their ingredients' totals scaled by each multiplier,
    /// recursing through nested recipes.
    pub fn nutrition(&self, id: FoodId) -> Option<Nutrition> {
        self.get(id).map(|food| self.nutrition_of(food))
    }

    fn nutrition_of(&self, food: &Food) -> Nutrition {
        match food {
            Food::Basic { nutrition, .. } => *nutrition,
            Food::Recipe { ingredients, .. } => ingredients
                .iter()
                .filter_map(|i| self.nutrition(i.food).map(|n| n * i.servings))
                .sum(),
        }
    }

    /// Add or re-weight an ingredient of a recipe already in the catalog
    pub fn add_ingredient(
        &mut self,
        recipe: FoodId,
        ingredient: FoodId,
        servings: f64,
    ) -> ModelResult<()> {
        let ingredient_name = self
            .get(ingredient)
            .ok_or(ModelError::UnknownFood(ingredient))?
            .name()
            .to_string();
        let recipe_food = self.get(recipe).ok_or(ModelError::UnknownFood(recipe))?;

        if recipe_food.is_recipe() && self.would_create_cycle(recipe, ingredient) {
            return Err(ModelError::CircularReference {
                recipe: recipe_food.name().to_string(),
                ingredient: ingredient_name,
            });
        }

        self.foods[recipe.0].add_ingredient(ingredient, servings)
    }

    /// Check whether `recipe` is reachable from `ingredient`, i.e. whether
    /// adding `ingredient` to `recipe` would make the recipe contain itself
    pub fn would_create_cycle(&self, recipe: FoodId, ingredient: FoodId) -> bool {
        let mut visited = HashSet::new();
        let mut to_check = vec![ingredient];

        while let Some(current) = to_check.pop() {
            if current == recipe {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(food) = self.get(current) {
                to_check.extend(food.ingredients().iter().map(|i| i.food));
            }
        }

        false
    }

    /// Every food id, ordered so each recipe follows all of its ingredients.
    ///
    /// Basic foods come first in insertion order, then recipes in insertion
    /// order, except that a recipe used as an ingredient is moved ahead of
    /// the first recipe that uses it. Editing an existing recipe can make it
    /// depend on a recipe added later, so insertion order alone is not enough
    /// for a loader that resolves names in file order.
    pub fn dependency_order(&self) -> Vec<FoodId> {
        let mut placed = vec![false; self.foods.len()];
        let mut order = Vec::with_capacity(self.foods.len());

        for (id, food) in self.all() {
            if !food.is_recipe() {
                placed[id.0] = true;
                order.push(id);
            }
        }
        for (id, food) in self.all() {
            if food.is_recipe() {
                self.place_after_ingredients(id, &mut placed, &mut order);
            }
        }

        order
    }

    fn place_after_ingredients(&self, id: FoodId, placed: &mut [bool], order: &mut Vec<FoodId>) {
        match placed.get_mut(id.0) {
            Some(seen) if !*seen => *seen = true,
            _ => return,
        }
        if let Some(food) = self.get(id) {
            for ingredient in food.ingredients() {
                self.place_after_ingredients(ingredient.food, placed, order);
            }
        }
        order.push(id);
    }

    /// Replace the stored nutrition of an atomic food.
    ///
    /// Every recipe containing it picks up the new values on its next
    /// [`FoodCatalog::nutrition`] call.
    pub fn set_nutrition(&mut self, id: FoodId, values: Nutrition) -> ModelResult<()> {
        match self.foods.get_mut(id.0) {
            Some(Food::Basic { nutrition, .. }) => {
                *nutrition = values;
                Ok(())
            }
            Some(Food::Recipe { name, .. }) => Err(ModelError::UnsupportedOperation(format!(
                "recipe '{}' derives its nutrition from its ingredients",
                name
            ))),
            None => Err(ModelError::UnknownFood(id)),
        }
    }
}
