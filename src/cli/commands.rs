use crate::config::SynonymMap;
use crate::db::{self, models::NewRecipe, DbPool};
use crate::error::Result;
use crate::filter;
use tracing::info;

/// Bulk-load recipes from a JSON array file, inside one transaction.
pub async fn import(pool: &DbPool, input: &str) -> Result<u64> {
    let raw = tokio::fs::read_to_string(input).await?;
    let recipes: Vec<NewRecipe> = serde_json::from_str(&raw)?;

    info!("Importing {} recipes from {}", recipes.len(), input);
    let inserted = db::recipes::insert_many(pool, &recipes).await?;

    Ok(inserted)
}

/// Run one retrieval against the corpus and print the results.
pub async fn filter(
    pool: &DbPool,
    synonyms: &SynonymMap,
    query: &str,
    max_calories: i64,
    allergens: &[String],
) -> Result<()> {
    let exclusions = filter::expand(allergens, synonyms);
    let expression = filter::build_expression(query, &exclusions);

    let recipes = filter::search(pool, &expression, max_calories, filter::RESULT_LIMIT).await?;

    let safe: Vec<_> = recipes
        .into_iter()
        .filter(|r| !exclusions.matches(&r.ingredients_text))
        .collect();

    if safe.is_empty() {
        println!("No safe recipes found.");
        return Ok(());
    }

    println!("Found {} safe recipes:\n", safe.len());
    for recipe in safe {
        println!("  {} ({} cal)", recipe.name, recipe.calories);
        println!("    Ingredients: {}", recipe.ingredients_text);
    }

    Ok(())
}
