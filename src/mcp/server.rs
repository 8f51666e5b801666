//! Diet Log MCP Server Implementation
//!
//! Exposes the session tools over MCP. The session sits behind one async
//! mutex, so tool calls are applied one at a time. Every mutating tool is
//! turned into an [`Action`] and applied with [`Session::handle_action`].

use std::sync::Arc;

use chrono::NaiveDate;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::models::EntryId;
use crate::tools::foods::IngredientInput;
use crate::tools::status::StatusTracker;
use crate::tools::{days, exercises, foods, Action, Session};

/// Diet Log MCP Service
#[derive(Clone)]
pub struct DietLogService {
    session: Arc<Mutex<Session>>,
    status_tracker: Arc<StatusTracker>,
    tool_router: ToolRouter<DietLogService>,
}

impl DietLogService {
    pub fn new(session: Session) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            status_tracker: Arc::new(StatusTracker::new()),
            tool_router: Self::tool_router(),
        }
    }

    /// Apply one action and return the refreshed day summary
    async fn apply(&self, action: Action) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        let summary = session
            .handle_action(action)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&summary)
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn parse_date(date: &str) -> Result<NaiveDate, McpError> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| {
        McpError::invalid_params(format!("Invalid date '{}'. Use YYYY-MM-DD.", date), None)
    })
}

// ============================================================================
// Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DateParams {
    /// Date in ISO format (YYYY-MM-DD)
    pub date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddBasicFoodParams {
    pub name: String,
    /// Calories per serving
    pub calories: f64,
    /// Fat per serving (grams)
    #[serde(default)]
    pub fat: f64,
    /// Carbohydrates per serving (grams)
    #[serde(default)]
    pub carbs: f64,
    /// Protein per serving (grams)
    #[serde(default)]
    pub protein: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IngredientParam {
    /// Name of an existing food or recipe
    pub name: String,
    /// Serving multiplier
    pub servings: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddRecipeParams {
    pub name: String,
    pub ingredients: Vec<IngredientParam>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExerciseParams {
    pub name: String,
    /// Calories burned per kg of body weight per hour
    pub calories_per_kg_per_hour: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogFoodParams {
    /// Food or recipe name (case-insensitive)
    pub food: String,
    #[serde(default = "default_servings")]
    pub servings: f64,
}

fn default_servings() -> f64 { 1.0 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogExerciseParams {
    /// Exercise name (case-insensitive)
    pub exercise: String,
    pub minutes: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetWeightParams {
    /// Body weight in kilograms
    pub weight_kg: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetCalorieGoalParams {
    pub calories: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EntryIdParams {
    /// Entry id from the day summary
    pub id: u64,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl DietLogService {
    // --- Status ---

    #[tool(description = "Get the current status of the Diet Log service including build info, data files, catalog sizes and process information")]
    async fn dietlog_status(&self) -> Result<CallToolResult, McpError> {
        let session = self.session.lock().await;
        json_result(&self.status_tracker.get_status(&session))
    }

    #[tool(description = "Get instructions for logging food, exercise, weight and calorie goals. Call this when starting a session or when unsure how to use the tools.")]
    fn logging_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::LOGGING_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(LOGGING_INSTRUCTIONS)]))
    }

    // --- Days ---

    #[tool(description = "Get the food log, exercise log, totals, weight and calorie goal for a date without changing the selected date")]
    async fn get_day(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let date = parse_date(&p.date)?;
        let session = self.session.lock().await;
        json_result(&days::get_day(&session, date))
    }

    #[tool(description = "Select the date that subsequent log, weight, goal and delete actions apply to")]
    async fn change_date(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let date = parse_date(&p.date)?;
        self.apply(Action::ChangeDate { date }).await
    }

    #[tool(description = "Log servings of a food or recipe on the selected date")]
    async fn log_food(&self, Parameters(p): Parameters<LogFoodParams>) -> Result<CallToolResult, McpError> {
        self.apply(Action::LogFood { food: p.food, servings: p.servings }).await
    }

    #[tool(description = "Log minutes of an exercise on the selected date")]
    async fn log_exercise(&self, Parameters(p): Parameters<LogExerciseParams>) -> Result<CallToolResult, McpError> {
        self.apply(Action::LogExercise { exercise: p.exercise, minutes: p.minutes }).await
    }

    #[tool(description = "Record body weight (kg) for the selected date. Carries forward to later dates until changed.")]
    async fn set_weight(&self, Parameters(p): Parameters<SetWeightParams>) -> Result<CallToolResult, McpError> {
        self.apply(Action::SetWeight { weight_kg: p.weight_kg }).await
    }

    #[tool(description = "Record the calorie goal for the selected date. Carries forward to later dates until changed.")]
    async fn set_calorie_goal(&self, Parameters(p): Parameters<SetCalorieGoalParams>) -> Result<CallToolResult, McpError> {
        self.apply(Action::SetCalorieGoal { calories: p.calories }).await
    }

    #[tool(description = "Delete a food log entry by id")]
    async fn delete_food_entry(&self, Parameters(p): Parameters<EntryIdParams>) -> Result<CallToolResult, McpError> {
        self.apply(Action::DeleteFoodEntry { id: EntryId(p.id) }).await
    }

    #[tool(description = "Delete an exercise log entry by id from the selected date")]
    async fn delete_exercise_entry(&self, Parameters(p): Parameters<EntryIdParams>) -> Result<CallToolResult, McpError> {
        self.apply(Action::DeleteExerciseEntry { id: EntryId(p.id) }).await
    }

    // --- Foods ---

    #[tool(description = "List all foods and recipes with their per-serving nutrition")]
    async fn list_foods(&self) -> Result<CallToolResult, McpError> {
        let session = self.session.lock().await;
        json_result(&foods::list_foods(&session))
    }

    #[tool(description = "Add a basic food with calories, fat, carbs and protein per serving")]
    async fn add_basic_food(&self, Parameters(p): Parameters<AddBasicFoodParams>) -> Result<CallToolResult, McpError> {
        self.apply(Action::AddBasicFood {
            name: p.name,
            calories: p.calories,
            fat: p.fat,
            carbs: p.carbs,
            protein: p.protein,
        })
        .await
    }

    #[tool(description = "Add a recipe made of existing foods or recipes, each with a serving multiplier")]
    async fn add_recipe(&self, Parameters(p): Parameters<AddRecipeParams>) -> Result<CallToolResult, McpError> {
        let ingredients: Vec<IngredientInput> = p
            .ingredients
            .into_iter()
            .map(|i| IngredientInput { name: i.name, servings: i.servings })
            .collect();
        self.apply(Action::AddRecipe { name: p.name, ingredients }).await
    }

    // --- Exercises ---

    #[tool(description = "List all exercises with their burn rates")]
    async fn list_exercises(&self) -> Result<CallToolResult, McpError> {
        let session = self.session.lock().await;
        json_result(&exercises::list_exercises(&session))
    }

    #[tool(description = "Add an exercise with its calories burned per kg per hour. Names must be unique ignoring case.")]
    async fn add_exercise(&self, Parameters(p): Parameters<ExerciseParams>) -> Result<CallToolResult, McpError> {
        self.apply(Action::AddExercise {
            name: p.name,
            calories_per_kg_per_hour: p.calories_per_kg_per_hour,
        })
        .await
    }

    #[tool(description = "Change the calories burned per kg per hour of an existing exercise")]
    async fn edit_exercise(&self, Parameters(p): Parameters<ExerciseParams>) -> Result<CallToolResult, McpError> {
        self.apply(Action::EditExercise {
            name: p.name,
            calories_per_kg_per_hour: p.calories_per_kg_per_hour,
        })
        .await
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for DietLogService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "dietlog".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Diet Log".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Diet Log - daily food, exercise, weight and calorie goal tracking. \
                 IMPORTANT: Call logging_instructions before logging. \
                 Days: get_day, change_date, log_food, log_exercise, set_weight, set_calorie_goal, \
                 delete_food_entry, delete_exercise_entry. \
                 Foods: list_foods, add_basic_food, add_recipe. \
                 Exercises: list_exercises, add_exercise, edit_exercise. \
                 Status: dietlog_status."
                    .into(),
            ),
        }
    }
}
