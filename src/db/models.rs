use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored recipe. The id is internal identity only and is never exposed
/// through the API projection.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub calories: i64,
    pub ingredients_text: String,
    pub instructions: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Recipe payload for ingestion. Accepts `ingredients` as an alias so bulk
/// import files can use the same field name the API response uses.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRecipe {
    pub name: String,
    pub calories: i64,
    #[serde(alias = "ingredients")]
    pub ingredients_text: String,
    pub instructions: String,
}

/// Full-row replacement for an existing recipe.
#[derive(Debug, Clone)]
pub struct UpdateRecipe {
    pub name: String,
    pub calories: i64,
    pub ingredients_text: String,
    pub instructions: String,
}
