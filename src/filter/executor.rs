use crate::db::{self, models::Recipe, DbPool};
use crate::error::Result;
use rand::seq::IteratorRandom;

/// Hard cap on rows returned by a single retrieval.
pub const RESULT_LIMIT: usize = 10;

/// Evaluate a match expression plus a calorie bound against the corpus and
/// return a uniformly sampled subset of the qualifying rows.
///
/// An empty expression is the "no full-text constraint" path: the calorie
/// bound alone filters the corpus. Sampling happens in-process over the
/// fetched candidate set, independent of the storage engine, so repeated
/// identical calls may return different subsets and the output order carries
/// no meaning.
pub async fn search(
    pool: &DbPool,
    expression: &str,
    max_calories: i64,
    limit: usize,
) -> Result<Vec<Recipe>> {
    let candidates = if expression.is_empty() {
        db::recipes::list_within_calories(pool, max_calories).await?
    } else {
        db::recipes::search_fts(pool, expression, max_calories).await?
    };

    let mut rng = rand::rng();
    Ok(candidates.into_iter().choose_multiple(&mut rng, limit))
}
