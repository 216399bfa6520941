use crate::db::{models::*, DbPool};
use crate::error::{Error, Result};
use chrono::Utc;

/// Create a new recipe
///
/// The FTS triggers fire within this statement, so the row and its index
/// entry become visible together.
pub async fn create_recipe(pool: &DbPool, new_recipe: &NewRecipe) -> Result<Recipe> {
    let now = Utc::now();

    let recipe = sqlx::query_as::<_, Recipe>(
        r#"
        INSERT INTO recipes (name, calories, ingredients_text, instructions, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&new_recipe.name)
    .bind(new_recipe.calories)
    .bind(&new_recipe.ingredients_text)
    .bind(&new_recipe.instructions)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(recipe)
}

/// Insert a batch of recipes inside a single transaction
///
/// Used by bulk ingestion: either every row (and every index entry) lands,
/// or none do.
pub async fn insert_many(pool: &DbPool, new_recipes: &[NewRecipe]) -> Result<u64> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    for new_recipe in new_recipes {
        sqlx::query(
            r#"
            INSERT INTO recipes (name, calories, ingredients_text, instructions, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new_recipe.name)
        .bind(new_recipe.calories)
        .bind(&new_recipe.ingredients_text)
        .bind(&new_recipe.instructions)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(new_recipes.len() as u64)
}

/// Get recipe by ID
pub async fn get_recipe(pool: &DbPool, recipe_id: i64) -> Result<Recipe> {
    let recipe = sqlx::query_as::<_, Recipe>("SELECT * FROM recipes WHERE id = ?")
        .bind(recipe_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Recipe {recipe_id} not found")))?;

    Ok(recipe)
}

/// Update recipe
pub async fn update_recipe(pool: &DbPool, recipe_id: i64, update: &UpdateRecipe) -> Result<Recipe> {
    let now = Utc::now();

    let recipe = sqlx::query_as::<_, Recipe>(
        r#"
        UPDATE recipes
        SET name = ?, calories = ?, ingredients_text = ?, instructions = ?, updated_at = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(&update.name)
    .bind(update.calories)
    .bind(&update.ingredients_text)
    .bind(&update.instructions)
    .bind(now)
    .bind(recipe_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::NotFound(format!("Recipe {recipe_id} not found")))?;

    Ok(recipe)
}

/// Delete recipe
pub async fn delete_recipe(pool: &DbPool, recipe_id: i64) -> Result<()> {
    sqlx::query("DELETE FROM recipes WHERE id = ?")
        .bind(recipe_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Count all recipes
pub async fn count_all_recipes(pool: &DbPool) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM recipes")
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

/// List recipes within a calorie bound (no text constraint)
pub async fn list_within_calories(pool: &DbPool, max_calories: i64) -> Result<Vec<Recipe>> {
    let recipes = sqlx::query_as::<_, Recipe>("SELECT * FROM recipes WHERE calories <= ?")
        .bind(max_calories)
        .fetch_all(pool)
        .await?;

    Ok(recipes)
}

/// Run a boolean match expression against the full-text index, bounded by
/// calories
///
/// A syntactically invalid expression is a request-level failure
/// (`Error::Query`), distinct from storage being unavailable.
pub async fn search_fts(
    pool: &DbPool,
    expression: &str,
    max_calories: i64,
) -> Result<Vec<Recipe>> {
    let recipes = sqlx::query_as::<_, Recipe>(
        r#"
        SELECT r.*
        FROM recipes r
        JOIN recipes_fts f ON r.id = f.rowid
        WHERE recipes_fts MATCH ?
        AND r.calories <= ?
        "#,
    )
    .bind(expression)
    .bind(max_calories)
    .fetch_all(pool)
    .await
    .map_err(|e| classify_match_error(e, expression))?;

    Ok(recipes)
}

/// Distinguish FTS5 parse failures from real storage errors.
fn classify_match_error(e: sqlx::Error, expression: &str) -> Error {
    if let sqlx::Error::Database(db) = &e {
        let msg = db.message();
        if msg.contains("fts5")
            || msg.contains("syntax error")
            || msg.contains("unterminated string")
            || msg.contains("no such column")
            || msg.contains("malformed MATCH")
        {
            return Error::Query(format!("{msg} (expression: {expression:?})"));
        }
    }
    Error::Database(e)
}
