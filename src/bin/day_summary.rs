//! Print the summary of one day
//! Usage: cargo run --bin day_summary -- [YYYY-MM-DD]

use chrono::NaiveDate;

use dietlog::store::DataFiles;
use dietlog::tools::{days, Session};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    let files = DataFiles::from_env();
    println!("Data directory: {}", files.dir().display());

    let session = Session::open(files)?;
    let date = match args.get(1) {
        Some(arg) => NaiveDate::parse_from_str(arg, "%Y-%m-%d")?,
        None => session.current_date(),
    };

    let summary = days::get_day(&session, date);

    println!("\n=== {} ===", summary.date);
    println!("\nFood:");
    if summary.foods.is_empty() {
        println!("  (none)");
    }
    for entry in &summary.foods {
        println!("  [{}] {}", entry.id, entry.display);
    }

    println!("\nExercise:");
    if summary.exercises.is_empty() {
        println!("  (none)");
    }
    for entry in &summary.exercises {
        println!("  [{}] {} ({:.1} cal)", entry.id, entry.display, entry.calories_burned);
    }

    let total = summary.nutrition_total;
    println!(
        "\nTotals: {:.1} cal, {:.1} fat, {:.1} carbs, {:.1} protein",
        total.calories, total.fat, total.carbs, total.protein
    );
    println!("Burned: {:.1} cal", summary.calories_burned);
    println!(
        "Weight: {:.1} kg{}",
        summary.weight_kg,
        if summary.weight_recorded { "" } else { " (carried forward)" }
    );
    println!("Goal: {:.1} cal", summary.calorie_goal);
    println!("Net: {:.1} cal, remaining {:.1} cal", summary.net_calories, summary.remaining_calories);

    Ok(())
}
