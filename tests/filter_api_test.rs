use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use larder::api::handlers::AppState;
use larder::api::models::FilterResponse;
use larder::api::routes::create_router;
use larder::config::{
    DatabaseConfig, RetrievalConfig, ServerConfig, Settings, SynonymMap,
};
use larder::db::models::NewRecipe;
use larder::db::{self, DbPool};
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use tower::ServiceExt;

fn test_settings() -> Settings {
    Settings {
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            connection_timeout_seconds: 30,
            idle_timeout_seconds: 600,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5001,
            max_request_body_size: 1048576,
        },
        retrieval: RetrievalConfig {
            synonyms_path: "/tmp/allergens.json".into(),
        },
    }
}

fn test_synonyms() -> SynonymMap {
    [
        (
            "milk".to_string(),
            vec![
                "butter".to_string(),
                "cheese".to_string(),
                "cream".to_string(),
            ],
        ),
        (
            "peanuts".to_string(),
            vec!["peanut".to_string(), "peanut butter".to_string()],
        ),
    ]
    .into_iter()
    .collect()
}

async fn seeded_pool() -> DbPool {
    // Single connection: each connection to sqlite::memory: is its own db
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    let seed = vec![
        NewRecipe {
            name: "Classic Peanut Butter Sandwich".to_string(),
            calories: 350,
            ingredients_text: "bread, peanut butter, jelly".to_string(),
            instructions: "1. Spread peanut butter on one slice of bread. 2. Enjoy.".to_string(),
        },
        NewRecipe {
            name: "Simple Garden Salad".to_string(),
            calories: 150,
            ingredients_text: "lettuce, tomato, olive oil, vinegar".to_string(),
            instructions: "1. Chop lettuce and tomatoes. 2. Toss in a bowl. 3. Add dressing."
                .to_string(),
        },
        NewRecipe {
            name: "Cheesy Scrambled Eggs".to_string(),
            calories: 420,
            ingredients_text: "eggs, milk, cheddar cheese, butter, salt".to_string(),
            instructions: "1. Whisk eggs, milk, and cheese. 2. Scramble in a hot pan.".to_string(),
        },
    ];
    db::recipes::insert_many(&pool, &seed)
        .await
        .expect("Failed to seed recipes");

    pool
}

async fn test_app(pool: DbPool) -> Router {
    let settings = test_settings();
    let state = AppState {
        pool,
        synonyms: Arc::new(test_synonyms()),
        settings: settings.clone(),
    };
    create_router(state, &settings)
}

async fn post_filter(app: Router, body: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/filter_recipes")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn test_peanut_exclusion() {
    // Requesting the allergen by name must never return it
    let app = test_app(seeded_pool().await).await;

    let (status, body) = post_filter(
        app,
        r#"{"max_calories": 2000, "allergens": ["peanuts"], "query": "peanut butter"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let response: FilterResponse = serde_json::from_value(body).unwrap();
    for recipe in &response.safe_recipes {
        assert!(
            !recipe.ingredients.to_lowercase().contains("peanut"),
            "Found 'peanut' in {}",
            recipe.name
        );
    }
}

#[tokio::test]
async fn test_calorie_limit() {
    let app = test_app(seeded_pool().await).await;

    let (status, body) = post_filter(
        app,
        r#"{"max_calories": 300, "allergens": [], "query": ""}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let response: FilterResponse = serde_json::from_value(body).unwrap();
    assert!(!response.safe_recipes.is_empty());
    for recipe in &response.safe_recipes {
        assert!(
            recipe.calories <= 300,
            "{} is over 300 calories",
            recipe.name
        );
    }
}

#[tokio::test]
async fn test_missing_fields_take_defaults() {
    let app = test_app(seeded_pool().await).await;

    let (status, body) = post_filter(app, "{}").await;

    assert_eq!(status, StatusCode::OK);
    let response: FilterResponse = serde_json::from_value(body).unwrap();
    // default max_calories=2000 admits all three seeded recipes
    assert_eq!(response.safe_recipes.len(), 3);
}

#[tokio::test]
async fn test_no_match_returns_empty_list_not_error() {
    let app = test_app(seeded_pool().await).await;

    let (status, body) = post_filter(
        app,
        r#"{"max_calories": 2000, "allergens": [], "query": "xylophone"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let response: FilterResponse = serde_json::from_value(body).unwrap();
    assert!(response.safe_recipes.is_empty());
}

#[tokio::test]
async fn test_result_cardinality_capped_at_ten() {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    db::run_migrations(&pool).await.unwrap();

    let seed: Vec<NewRecipe> = (0..15)
        .map(|i| NewRecipe {
            name: format!("Vegetable Soup {i}"),
            calories: 200,
            ingredients_text: "carrot, celery, onion, water".to_string(),
            instructions: "Simmer.".to_string(),
        })
        .collect();
    db::recipes::insert_many(&pool, &seed).await.unwrap();

    let app = test_app(pool).await;
    let (status, body) = post_filter(app, r#"{"max_calories": 2000}"#).await;

    assert_eq!(status, StatusCode::OK);
    let response: FilterResponse = serde_json::from_value(body).unwrap();
    assert_eq!(response.safe_recipes.len(), 10);
}

#[tokio::test]
async fn test_repeated_requests_stay_safe() {
    // Results may differ between calls; the invariants may not.
    let pool = seeded_pool().await;

    for _ in 0..5 {
        let app = test_app(pool.clone()).await;
        let (status, body) = post_filter(
            app,
            r#"{"max_calories": 400, "allergens": ["milk"], "query": "salad"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let response: FilterResponse = serde_json::from_value(body).unwrap();
        for recipe in &response.safe_recipes {
            assert!(recipe.calories <= 400);
            let ingredients = recipe.ingredients.to_lowercase();
            for term in ["milk", "butter", "cheese", "cream"] {
                assert!(
                    !ingredients.contains(term),
                    "Found '{term}' in {}",
                    recipe.name
                );
            }
        }
    }
}

#[tokio::test]
async fn test_malformed_expression_is_request_failure() {
    let app = test_app(seeded_pool().await).await;

    // Unbalanced quote in the free text reaches the match grammar verbatim
    let (status, body) = post_filter(
        app,
        r#"{"max_calories": 2000, "allergens": [], "query": "\"unbalanced"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.get("error").is_some());
}
