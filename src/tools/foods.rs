//! Food tools
//!
//! Listing the food catalog and adding basic foods and recipes.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::validate;
use super::Session;
use crate::models::{Food, FoodKind, Nutrition};

/// Food summary for listing
#[derive(Debug, Serialize)]
pub struct FoodSummary {
    pub name: String,
    pub kind: FoodKind,
    pub display: String,
    pub nutrition: Nutrition,
    pub ingredients: Vec<IngredientInput>,
}

/// Response for list_foods
#[derive(Debug, Serialize)]
pub struct ListFoodsResponse {
    pub foods: Vec<FoodSummary>,
    pub total: usize,
}

/// Response for add_basic_food and add_recipe
#[derive(Debug, Serialize)]
pub struct AddFoodResponse {
    pub name: String,
    pub kind: FoodKind,
    pub nutrition: Nutrition,
    /// Ingredients that made it into the recipe (empty for basic foods)
    pub ingredients: Vec<IngredientInput>,
}

/// An ingredient given by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientInput {
    pub name: String,
    pub servings: f64,
}

fn ingredient_inputs(session: &Session, food: &Food) -> Vec<IngredientInput> {
    food.ingredients()
        .iter()
        .filter_map(|i| {
            session.foods.get(i.food).map(|f| IngredientInput {
                name: f.name().to_string(),
                servings: i.servings,
            })
        })
        .collect()
}

/// List all foods in catalog order
pub fn list_foods(session: &Session) -> ListFoodsResponse {
    let foods: Vec<FoodSummary> = session
        .foods
        .all()
        .map(|(id, food)| FoodSummary {
            name: food.name().to_string(),
            kind: food.kind(),
            display: food.to_string(),
            nutrition: session.foods.nutrition(id).unwrap_or_default(),
            ingredients: ingredient_inputs(session, food),
        })
        .collect();
    let total = foods.len();
    ListFoodsResponse { foods, total }
}

/// Add a basic food with per-serving nutrition
pub fn add_basic_food(
    session: &mut Session,
    name: &str,
    nutrition: Nutrition,
) -> Result<AddFoodResponse, String> {
    let name = validate::name("Food", name)?;
    if !nutrition.is_valid() {
        return Err("Calories, fat, carbs and protein must be non-negative numbers".to_string());
    }

    session.update_foods(|foods| {
        foods
            .add(Food::basic(name, nutrition))
            .map_err(|e| e.to_string())
    })?;
    info!(food = name, "Added basic food");

    Ok(AddFoodResponse {
        name: name.to_string(),
        kind: FoodKind::Basic,
        nutrition,
        ingredients: Vec::new(),
    })
}

/// Add a recipe built from foods already in the catalog.
///
/// Every ingredient name must resolve; naming the same food twice keeps the
/// last multiplier.
pub fn add_recipe(
    session: &mut Session,
    name: &str,
    ingredients: &[IngredientInput],
) -> Result<AddFoodResponse, String> {
    let name = validate::name("Recipe", name)?;
    if ingredients.is_empty() {
        return Err("A recipe needs at least one ingredient".to_string());
    }

    let mut recipe = Food::recipe(name);
    for ingredient in ingredients {
        let servings = validate::positive("ingredient servings", ingredient.servings)?;
        let id = session
            .foods
            .find_by_name(ingredient.name.trim())
            .ok_or_else(|| format!("Ingredient '{}' not found", ingredient.name.trim()))?;
        recipe
            .add_ingredient(id, servings)
            .map_err(|e| e.to_string())?;
    }

    let id = session.update_foods(|foods| foods.add(recipe).map_err(|e| e.to_string()))?;
    info!(recipe = name, ingredients = ingredients.len(), "Added recipe");

    let food = session
        .foods
        .get(id)
        .ok_or_else(|| format!("Recipe '{}' missing after insert", name))?;
    Ok(AddFoodResponse {
        name: name.to_string(),
        kind: FoodKind::Recipe,
        nutrition: session.foods.nutrition(id).unwrap_or_default(),
        ingredients: ingredient_inputs(session, food),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyLog, ExerciseCatalog, FoodCatalog};
    use crate::store::DataFiles;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn empty_session(dir: &TempDir) -> Session {
        Session::with_data(
            DataFiles::new(dir.path()),
            FoodCatalog::new(),
            ExerciseCatalog::new(),
            DailyLog::new(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
    }

    fn ingredient(name: &str, servings: f64) -> IngredientInput {
        IngredientInput {
            name: name.to_string(),
            servings,
        }
    }

    #[test]
    fn test_add_foods_and_recipe() {
        let dir = TempDir::new().unwrap();
        let mut session = empty_session(&dir);
        add_basic_food(&mut session, "Apple", Nutrition::new(95.0, 0.3, 25.0, 0.5)).unwrap();
        add_basic_food(&mut session, " Banana ", Nutrition::new(105.0, 0.4, 27.0, 1.3)).unwrap();

        let response = add_recipe(
            &mut session,
            "Fruit Bowl",
            &[ingredient("apple", 2.0), ingredient("BANANA", 1.0)],
        )
        .unwrap();
        assert!((response.nutrition.calories - 295.0).abs() < 1e-9);
        assert_eq!(response.ingredients[1], ingredient("Banana", 1.0));

        let text = fs::read_to_string(session.files().foods_path()).unwrap();
        assert_eq!(
            text,
            "b,Apple,95,0.3,25,0.5\nb,Banana,105,0.4,27,1.3\nr,Fruit Bowl,Apple,2,Banana,1\n"
        );

        let listing = list_foods(&session);
        assert_eq!(listing.total, 3);
        assert_eq!(listing.foods[2].display, "Fruit Bowl (Recipe)");
        assert_eq!(listing.foods[0].display, "Apple (95 cal)");
    }

    #[test]
    fn test_duplicate_food_rejected() {
        let dir = TempDir::new().unwrap();
        let mut session = empty_session(&dir);
        add_basic_food(&mut session, "Apple", Nutrition::new(95.0, 0.3, 25.0, 0.5)).unwrap();
        let err = add_basic_food(&mut session, "APPLE", Nutrition::zero()).unwrap_err();
        assert!(err.contains("already exists"));
        assert_eq!(session.foods().len(), 1);
    }

    #[test]
    fn test_recipe_validation() {
        let dir = TempDir::new().unwrap();
        let mut session = empty_session(&dir);
        add_basic_food(&mut session, "Apple", Nutrition::new(95.0, 0.3, 25.0, 0.5)).unwrap();

        assert!(add_recipe(&mut session, "Empty", &[]).is_err());
        assert!(add_recipe(&mut session, "Bad", &[ingredient("Pear", 1.0)]).is_err());
        assert!(add_recipe(&mut session, "Zero", &[ingredient("Apple", 0.0)]).is_err());
        assert!(add_recipe(&mut session, "a,b", &[ingredient("Apple", 1.0)]).is_err());
        assert!(add_basic_food(&mut session, "Neg", Nutrition::new(-1.0, 0.0, 0.0, 0.0)).is_err());
        assert_eq!(session.foods().len(), 1);
    }

    #[test]
    fn test_failed_save_keeps_catalog_unchanged() {
        let dir = TempDir::new().unwrap();
        let mut session = empty_session(&dir);
        add_basic_food(&mut session, "Apple", Nutrition::new(95.0, 0.3, 25.0, 0.5)).unwrap();

        session.files = DataFiles::new(dir.path().join("missing"));
        assert!(add_basic_food(&mut session, "Pear", Nutrition::new(57.0, 0.1, 15.0, 0.4)).is_err());
        assert!(add_recipe(&mut session, "Apples", &[ingredient("Apple", 2.0)]).is_err());
        assert_eq!(session.foods().len(), 1);

        // The same names are still free once saving works again
        session.files().ensure_dir().unwrap();
        add_basic_food(&mut session, "Pear", Nutrition::new(57.0, 0.1, 15.0, 0.4)).unwrap();
        add_recipe(&mut session, "Apples", &[ingredient("Apple", 2.0)]).unwrap();
        assert_eq!(session.foods().len(), 3);
    }

    #[test]
    fn test_repeated_ingredient_keeps_last_multiplier() {
        let dir = TempDir::new().unwrap();
        let mut session = empty_session(&dir);
        add_basic_food(&mut session, "Apple", Nutrition::new(95.0, 0.3, 25.0, 0.5)).unwrap();
        let response = add_recipe(
            &mut session,
            "Apples",
            &[ingredient("Apple", 1.0), ingredient("apple", 3.0)],
        )
        .unwrap();
        assert_eq!(response.ingredients.len(), 1);
        assert!((response.nutrition.calories - 285.0).abs() < 1e-9);
    }
}
