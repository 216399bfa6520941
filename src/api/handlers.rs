use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::debug;

use crate::{api::models::*, config::SynonymMap, db, filter, Result};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::SqlitePool,
    pub synonyms: Arc<SynonymMap>,
    pub settings: crate::config::Settings,
}

/// POST /filter_recipes - Retrieve allergen-safe recipes
pub async fn filter_recipes(
    State(state): State<AppState>,
    Json(req): Json<FilterRequest>,
) -> Result<Json<FilterResponse>> {
    debug!(
        "Filter request: query={:?} max_calories={} allergens={:?}",
        req.query, req.max_calories, req.allergens
    );

    let exclusions = filter::expand(&req.allergens, &state.synonyms);
    let expression = filter::build_expression(&req.query, &exclusions);

    let candidates = filter::search(
        &state.pool,
        &expression,
        req.max_calories,
        filter::RESULT_LIMIT,
    )
    .await?;

    // The index excludes on token boundaries; the invariant is stated over
    // substrings. Re-check every candidate before it leaves the service.
    let safe_recipes: Vec<SafeRecipe> = candidates
        .into_iter()
        .filter(|r| !exclusions.matches(&r.ingredients_text))
        .map(|r| SafeRecipe {
            name: r.name,
            calories: r.calories,
            ingredients: r.ingredients_text,
            instructions: r.instructions,
        })
        .collect();

    debug!("Returning {} safe recipes", safe_recipes.len());

    Ok(Json(FilterResponse { safe_recipes }))
}

/// GET /stats - System statistics
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<Stats>> {
    let total_recipes = db::recipes::count_all_recipes(&state.pool).await?;
    Ok(Json(Stats { total_recipes }))
}

/// GET /health - Liveness check
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// GET /ready - Readiness check (probes the database)
pub async fn readiness_check(State(state): State<AppState>) -> Json<ReadinessResponse> {
    let database = match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => "ok".to_string(),
        Err(e) => {
            tracing::warn!("Readiness probe failed: {}", e);
            "unavailable".to_string()
        }
    };

    Json(ReadinessResponse {
        ready: database == "ok",
        database,
    })
}
