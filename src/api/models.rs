use serde::{Deserialize, Serialize};

/// Body of POST /filter_recipes
///
/// Every field is optional on the wire; missing fields take the documented
/// defaults rather than failing the request.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterRequest {
    #[serde(default = "default_max_calories")]
    pub max_calories: i64,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub query: String,
}

fn default_max_calories() -> i64 {
    2000
}

/// Successful filter response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterResponse {
    pub safe_recipes: Vec<SafeRecipe>,
}

/// The fixed projection of a returned recipe: no internal id, no rank score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafeRecipe {
    pub name: String,
    pub calories: i64,
    pub ingredients: String,
    pub instructions: String,
}

/// System statistics
#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub total_recipes: i64,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub database: String,
}
