//! Line codec for the data files
//!
//! Comma-separated records, one per line, tagged by record type:
//!
//! - foods file: `b,name,calories,fat,carbs,protein` and
//!   `r,name[,ingredient,servings]*`
//! - exercise file: `e,name,caloriesPerKgPerHour`
//! - log file: `yyyy,mm,dd,f,food,servings`, `yyyy,mm,dd,e,exercise,minutes`,
//!   `yyyy,mm,dd,w,weight`, `yyyy,mm,dd,c,calorieGoal`
//!
//! Lines that do not parse are skipped and counted; a bad line never aborts a
//! load and never leaves a partial record behind.

use std::fmt::Write as _;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::{debug, warn};

use crate::models::{DailyLog, Exercise, ExerciseCatalog, Food, FoodCatalog, Nutrition};

/// Counts from parsing one file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Records stored
    pub loaded: usize,
    /// Non-blank lines that were malformed, duplicated or unresolved
    pub skipped: usize,
}

impl LoadReport {
    fn skip(&mut self, line_no: usize, reason: &str, line: &str) {
        warn!(line = line_no, reason, content = line, "Skipping line");
        self.skipped += 1;
    }
}

fn parse_number(field: &str) -> Option<f64> {
    field.trim().parse::<f64>().ok()
}

/// Non-blank lines with their 1-based line numbers
fn records(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty())
}

// ============================================================================
// Foods
// ============================================================================

/// Parse a foods file.
///
/// Pass one loads every `b` line. Pass two loads `r` lines in file order,
/// resolving ingredient names against foods already in the catalog (basic
/// foods plus recipes loaded earlier in this pass). Unknown ingredient names
/// are dropped from the recipe.
pub fn parse_foods(text: &str) -> (FoodCatalog, LoadReport) {
    let mut catalog = FoodCatalog::new();
    let mut report = LoadReport::default();
    let mut recipe_lines = Vec::new();

    for (line_no, line) in records(text) {
        let parts: Vec<&str> = line.split(',').collect();
        match parts[0] {
            "b" => match parse_basic(&parts) {
                Some(food) => match catalog.add(food) {
                    Ok(_) => report.loaded += 1,
                    Err(e) => report.skip(line_no, &e.to_string(), line),
                },
                None => report.skip(line_no, "malformed basic food", line),
            },
            "r" => recipe_lines.push((line_no, line, parts)),
            _ => report.skip(line_no, "unknown record tag", line),
        }
    }

    for (line_no, line, parts) in recipe_lines {
        match parse_recipe(&parts, &catalog) {
            Some(recipe) => match catalog.add(recipe) {
                Ok(_) => report.loaded += 1,
                Err(e) => report.skip(line_no, &e.to_string(), line),
            },
            None => report.skip(line_no, "malformed recipe", line),
        }
    }

    (catalog, report)
}

fn parse_basic(parts: &[&str]) -> Option<Food> {
    if parts.len() != 6 {
        return None;
    }
    let nutrition = Nutrition::new(
        parse_number(parts[2])?,
        parse_number(parts[3])?,
        parse_number(parts[4])?,
        parse_number(parts[5])?,
    );
    Some(Food::basic(parts[1], nutrition))
}

fn parse_recipe(parts: &[&str], catalog: &FoodCatalog) -> Option<Food> {
    if parts.len() < 2 || parts.len() % 2 != 0 {
        return None;
    }

    // Validate every amount before building anything
    let pairs = parts[2..]
        .chunks(2)
        .map(|pair| parse_number(pair[1]).map(|servings| (pair[0], servings)))
        .collect::<Option<Vec<_>>>()?;

    let mut recipe = Food::recipe(parts[1]);
    for (name, servings) in pairs {
        match catalog.find_by_name(name) {
            Some(id) => recipe.add_ingredient(id, servings).ok()?,
            None => debug!(recipe = parts[1], ingredient = name, "Dropping unknown ingredient"),
        }
    }
    Some(recipe)
}

/// Encode a food catalog, one line per food.
///
/// Lines follow [`FoodCatalog::dependency_order`] so every recipe is written
/// after the recipes it uses and [`parse_foods`] can resolve all of them.
pub fn encode_foods(catalog: &FoodCatalog) -> String {
    let mut out = String::new();
    for food in catalog.dependency_order().into_iter().filter_map(|id| catalog.get(id)) {
        match food {
            Food::Basic { name, nutrition } => {
                let _ = writeln!(
                    out,
                    "b,{},{},{},{},{}",
                    name, nutrition.calories, nutrition.fat, nutrition.carbs, nutrition.protein
                );
            }
            Food::Recipe { name, ingredients } => {
                out.push_str("r,");
                out.push_str(name);
                for ingredient in ingredients {
                    if let Some(food) = catalog.get(ingredient.food) {
                        let _ = write!(out, ",{},{}", food.name(), ingredient.servings);
                    }
                }
                out.push('\n');
            }
        }
    }
    out
}

// ============================================================================
// Exercises
// ============================================================================

/// Parse an exercise file; duplicate names keep the first definition
pub fn parse_exercises(text: &str) -> (ExerciseCatalog, LoadReport) {
    let mut catalog = ExerciseCatalog::new();
    let mut report = LoadReport::default();

    for (line_no, line) in records(text) {
        let parts: Vec<&str> = line.split(',').collect();
        if parts[0] != "e" || parts.len() != 3 || parts[1].trim().is_empty() {
            report.skip(line_no, "malformed exercise", line);
            continue;
        }
        let Some(rate) = parse_number(parts[2]) else {
            report.skip(line_no, "bad burn rate", line);
            continue;
        };
        if catalog.find_by_name(parts[1]).is_some() {
            report.skip(line_no, "duplicate exercise", line);
            continue;
        }
        match catalog.add(Exercise::new(parts[1], rate)) {
            Ok(_) => report.loaded += 1,
            Err(e) => report.skip(line_no, &e.to_string(), line),
        }
    }

    (catalog, report)
}

pub fn encode_exercises(catalog: &ExerciseCatalog) -> String {
    let mut out = String::new();
    for (_, exercise) in catalog.all() {
        let _ = writeln!(out, "e,{},{}", exercise.name, exercise.calories_per_kg_per_hour);
    }
    out
}

// ============================================================================
// Log
// ============================================================================

/// Parse a log file against already-populated catalogs.
///
/// Entries naming an unknown food or exercise are skipped.
pub fn parse_log(
    text: &str,
    foods: &FoodCatalog,
    exercises: &ExerciseCatalog,
) -> (DailyLog, LoadReport) {
    let mut log = DailyLog::new();
    let mut report = LoadReport::default();

    for (line_no, line) in records(text) {
        let parts: Vec<&str> = line.split(',').collect();
        if parts.len() < 5 {
            report.skip(line_no, "too few fields", line);
            continue;
        }
        let Some(date) = parse_date(&parts[..3]) else {
            report.skip(line_no, "invalid date", line);
            continue;
        };

        let stored = match (parts[3], parts.len()) {
            ("f", 6) => parse_number(parts[5]).and_then(|servings| {
                let food = foods.find_by_name(parts[4]);
                if food.is_none() {
                    debug!(food = parts[4], "Dropping log entry for unknown food");
                }
                food.map(|id| {
                    log.add_food_entry(date, id, servings);
                })
            }),
            ("e", 6) => parse_number(parts[5]).and_then(|minutes| {
                let exercise = exercises.find_by_name(parts[4]);
                if exercise.is_none() {
                    debug!(exercise = parts[4], "Dropping log entry for unknown exercise");
                }
                exercise.map(|id| {
                    log.add_exercise_entry(date, id, minutes);
                })
            }),
            ("w", 5) => parse_number(parts[4]).map(|weight| log.set_weight_for_date(date, weight)),
            ("c", 5) => parse_number(parts[4]).map(|goal| log.set_calorie_goal_for_date(date, goal)),
            _ => None,
        }
        .is_some();

        if stored {
            report.loaded += 1;
        } else {
            report.skip(line_no, "malformed or unresolved log record", line);
        }
    }

    (log, report)
}

fn parse_date(fields: &[&str]) -> Option<NaiveDate> {
    let year = fields[0].trim().parse::<i32>().ok()?;
    let month = fields[1].trim().parse::<u32>().ok()?;
    let day = fields[2].trim().parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn date_prefix(date: NaiveDate) -> String {
    format!("{},{:02},{:02}", date.year(), date.month(), date.day())
}

/// Encode the log: food entries in store order, then exercise entries by
/// date, then weights, then calorie goals
pub fn encode_log(log: &DailyLog, foods: &FoodCatalog, exercises: &ExerciseCatalog) -> String {
    let mut out = String::new();

    for entry in log.food_entries() {
        if let Some(food) = foods.get(entry.food) {
            let _ = writeln!(out, "{},f,{},{}", date_prefix(entry.date), food.name(), entry.servings);
        }
    }

    for date in log.exercise_dates() {
        for entry in log.exercises_for_date(date) {
            if let Some(exercise) = exercises.get(entry.exercise) {
                let _ = writeln!(out, "{},e,{},{}", date_prefix(date), exercise.name, entry.minutes);
            }
        }
    }

    for (date, weight) in log.weights() {
        let _ = writeln!(out, "{},w,{}", date_prefix(date), weight);
    }

    for (date, goal) in log.calorie_goals() {
        let _ = writeln!(out, "{},c,{}", date_prefix(date), goal);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOODS: &str = "\
r,Fruit Bowl,Apple,2,Banana,1
b,Apple,95,0.3,25,0.5
b,Banana,105.0,0.4,27.0,1.3
r,Brunch,Fruit Bowl,0.5,Toast,1
r,Early,Brunch,1
";

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_foods_two_pass() {
        let (catalog, report) = parse_foods(FOODS);
        assert_eq!(report, LoadReport { loaded: 5, skipped: 0 });

        let bowl = catalog.find_by_name("fruit bowl").unwrap();
        assert!((catalog.nutrition(bowl).unwrap().calories - 295.0).abs() < 1e-9);

        // Toast is unknown and dropped; Fruit Bowl resolves from this pass
        let brunch = catalog.find_by_name("Brunch").unwrap();
        assert_eq!(catalog.get(brunch).unwrap().ingredients().len(), 1);
        assert!((catalog.nutrition(brunch).unwrap().calories - 147.5).abs() < 1e-9);

        // Brunch is defined before Early in the file, so it resolves
        let early = catalog.find_by_name("Early").unwrap();
        assert_eq!(catalog.get(early).unwrap().ingredients().len(), 1);
    }

    #[test]
    fn test_recipe_referencing_later_recipe_drops_ingredient() {
        let text = "r,First,Second,1\nr,Second,Apple,1\nb,Apple,95,0,0,0\n";
        let (catalog, _) = parse_foods(text);
        let first = catalog.find_by_name("First").unwrap();
        assert!(catalog.get(first).unwrap().ingredients().is_empty());
    }

    #[test]
    fn test_parse_foods_skips_malformed_lines() {
        let text = "b,Apple,95,0.3,25\nb,Pear,abc,0,0,0\nr,Odd,Apple\nx,what\nb,Kiwi,42,0,10,1\nb,kiwi,1,1,1,1\n";
        let (catalog, report) = parse_foods(text);
        assert_eq!(catalog.len(), 1);
        assert_eq!(report, LoadReport { loaded: 1, skipped: 5 });
    }

    #[test]
    fn test_loading_foods_twice_is_identical() {
        let (first, _) = parse_foods(FOODS);
        let (second, _) = parse_foods(FOODS);
        for (id, food) in first.all() {
            let other = second.find_by_name(food.name()).unwrap();
            assert_eq!(first.nutrition(id), second.nutrition(other));
        }
    }

    #[test]
    fn test_foods_round_trip() {
        let (catalog, _) = parse_foods(FOODS);
        let (reloaded, report) = parse_foods(&encode_foods(&catalog));
        assert_eq!(report.skipped, 0);
        assert_eq!(reloaded.len(), catalog.len());
        for (id, food) in catalog.all() {
            let other = reloaded.find_by_name(food.name()).unwrap();
            assert_eq!(reloaded.get(other).unwrap().kind(), food.kind());
            assert_eq!(catalog.nutrition(id), reloaded.nutrition(other));
        }
    }

    #[test]
    fn test_edited_recipe_using_later_recipe_round_trips() {
        let (mut catalog, _) =
            parse_foods("b,Apple,95,0,0,0\nr,Bowl,Apple,1\nr,Snack,Apple,2\n");
        let bowl = catalog.find_by_name("Bowl").unwrap();
        let snack = catalog.find_by_name("Snack").unwrap();
        catalog.add_ingredient(bowl, snack, 1.0).unwrap();
        assert!((catalog.nutrition(bowl).unwrap().calories - 285.0).abs() < 1e-9);

        let encoded = encode_foods(&catalog);
        assert_eq!(
            encoded,
            "b,Apple,95,0,0,0\nr,Snack,Apple,2\nr,Bowl,Apple,1,Snack,1\n"
        );

        let (reloaded, report) = parse_foods(&encoded);
        assert_eq!(report, LoadReport { loaded: 3, skipped: 0 });
        let bowl = reloaded.find_by_name("Bowl").unwrap();
        assert_eq!(reloaded.get(bowl).unwrap().ingredients().len(), 2);
        assert!((reloaded.nutrition(bowl).unwrap().calories - 285.0).abs() < 1e-9);
    }

    #[test]
    fn test_encode_foods_format() {
        let (catalog, _) = parse_foods("b,Apple,95,0.3,25,0.5\nr,Pair,Apple,2\n");
        assert_eq!(encode_foods(&catalog), "b,Apple,95,0.3,25,0.5\nr,Pair,Apple,2\n");
    }

    #[test]
    fn test_parse_exercises() {
        let text = "e,Running,7.0\ne,running,9\ne,Swimming\ne,Rowing,x\ne,Cycling,7.5\n";
        let (catalog, report) = parse_exercises(text);
        assert_eq!(report, LoadReport { loaded: 2, skipped: 3 });
        let running = catalog.find_by_name("RUNNING").unwrap();
        assert_eq!(catalog.get(running).unwrap().calories_per_kg_per_hour, 7.0);
        assert_eq!(encode_exercises(&catalog), "e,Running,7\ne,Cycling,7.5\n");
    }

    #[test]
    fn test_log_round_trip() {
        let (foods, _) = parse_foods(FOODS);
        let (exercises, _) = parse_exercises("e,Running,7\n");
        let text = "\
2024,01,02,f,Apple,1.5
2024,1,2,f,fruit bowl,1
2024,01,02,e,Running,30
2024,01,01,w,70
2024,01,10,w,72.5
2024,01,01,c,1800
";
        let (log, report) = parse_log(text, &foods, &exercises);
        assert_eq!(report, LoadReport { loaded: 6, skipped: 0 });
        assert!((log.total_calories_for_date(day(2024, 1, 2), &foods) - (142.5 + 295.0)).abs() < 1e-9);
        assert_eq!(log.weight_for_date(day(2024, 1, 5)), 70.0);

        let encoded = encode_log(&log, &foods, &exercises);
        assert_eq!(
            encoded,
            "\
2024,01,02,f,Apple,1.5
2024,01,02,f,Fruit Bowl,1
2024,01,02,e,Running,30
2024,01,01,w,70
2024,01,10,w,72.5
2024,01,01,c,1800
"
        );
        let (reloaded, _) = parse_log(&encoded, &foods, &exercises);
        assert_eq!(reloaded.food_entries().len(), 2);
        assert_eq!(reloaded.exercises_for_date(day(2024, 1, 2)).len(), 1);
        assert_eq!(reloaded.calorie_goal_for_date(day(2024, 2, 1)), 1800.0);
    }

    #[test]
    fn test_exercise_entries_encode_grouped_by_ascending_date() {
        let (foods, _) = parse_foods(FOODS);
        let (exercises, _) = parse_exercises("e,Running,7\ne,Walking,3.5\n");
        let running = exercises.find_by_name("Running").unwrap();
        let walking = exercises.find_by_name("Walking").unwrap();

        let mut log = DailyLog::new();
        log.add_exercise_entry(day(2024, 3, 2), running, 20.0);
        log.add_exercise_entry(day(2024, 1, 15), walking, 45.0);
        log.add_exercise_entry(day(2024, 3, 2), walking, 10.0);
        log.add_exercise_entry(day(2023, 12, 31), running, 30.0);

        assert_eq!(
            encode_log(&log, &foods, &exercises),
            "\
2023,12,31,e,Running,30
2024,01,15,e,Walking,45
2024,03,02,e,Running,20
2024,03,02,e,Walking,10
"
        );
    }

    #[test]
    fn test_parse_log_skips_bad_and_unresolved_lines() {
        let (foods, _) = parse_foods(FOODS);
        let (exercises, _) = parse_exercises("e,Running,7\n");
        let text = "\
2024,02,30,w,70
2024,01,01,f,Pizza,1
2024,01,01,e,Rowing,20
2024,01,01,f,Apple
2024,01,01,w,heavy
2024,01,01,x,1
2024,01
\r
2024,01,01,f,Apple,2\r
";
        let (log, report) = parse_log(text, &foods, &exercises);
        assert_eq!(report, LoadReport { loaded: 1, skipped: 7 });
        assert_eq!(log.food_entries().len(), 1);
        assert_eq!(log.weights().count(), 0);
    }
}
