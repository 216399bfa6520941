use clap::Parser;
use larder::{
    api::{handlers::AppState, routes},
    cli::{Cli, Commands},
    config::{Settings, SynonymMap},
    db, Error, Result,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    // Silently ignore if file doesn't exist
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,larder=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::from_env()?;
    settings.validate()?;

    // Handle commands
    match cli.command {
        Commands::Serve { port, host } => {
            serve(settings, port, host).await?;
        }
        Commands::Migrate => {
            migrate(settings).await?;
        }
        Commands::Import { input } => {
            import(settings, input).await?;
        }
        Commands::Filter {
            query,
            max_calories,
            allergens,
        } => {
            filter(settings, query, max_calories, allergens).await?;
        }
    }

    Ok(())
}

async fn serve(mut settings: Settings, port: Option<u16>, host: Option<String>) -> Result<()> {
    // Override settings with CLI arguments
    if let Some(port) = port {
        settings.server.port = port;
    }
    if let Some(host) = host {
        settings.server.host = host;
    }

    info!("Starting Larder server");
    info!("Database: {}", settings.database.url);
    info!("Server: {}:{}", settings.server.host, settings.server.port);

    // Initialize database with connection pooling configuration
    let pool = db::init_pool_with_config(&settings.database).await?;
    info!(
        "Database connection established (max_connections: {}, min_connections: {})",
        settings.database.max_connections, settings.database.min_connections
    );

    // Run migrations
    db::run_migrations(&pool).await?;
    info!("Database migrations completed");

    // Load the allergen synonym dictionary once; it is immutable for the
    // lifetime of the process. A missing file degrades to no expansion.
    let synonyms = match SynonymMap::from_file(&settings.retrieval.synonyms_path) {
        Ok(map) => {
            info!(
                "Loaded allergen synonyms: {} entries from {}",
                map.len(),
                settings.retrieval.synonyms_path.display()
            );
            map
        }
        Err(e) => {
            warn!(
                "Failed to load allergen synonyms from {}: {}",
                settings.retrieval.synonyms_path.display(),
                e
            );
            warn!("Continuing with an empty synonym dictionary - allergens will not be expanded");
            SynonymMap::default()
        }
    };

    // Create application state
    let state = AppState {
        pool,
        synonyms: Arc::new(synonyms),
        settings: settings.clone(),
    };

    // Create router
    let app = routes::create_router(state, &settings);

    // Start server
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    println!("\n========================================");
    println!("Larder - Allergen-Safe Recipe Retrieval");
    println!("========================================");
    println!("Status: Running");
    println!("Address: http://{addr}");
    println!("\nAPI Endpoints:");
    println!("  POST /filter_recipes");
    println!("  GET  /stats");
    println!("  GET  /health");
    println!("  GET  /ready");
    println!("\nPress Ctrl+C to stop");
    println!("========================================\n");

    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::Internal(format!("Server error: {e}")))?;

    info!("Shutting down...");
    Ok(())
}

async fn migrate(settings: Settings) -> Result<()> {
    info!("Running database migrations");

    let pool = db::init_pool(&settings.database.url).await?;
    db::run_migrations(&pool).await?;

    println!("Database migrations completed successfully");
    Ok(())
}

async fn import(settings: Settings, input: String) -> Result<()> {
    let pool = db::init_pool(&settings.database.url).await?;
    db::run_migrations(&pool).await?;

    let inserted = larder::cli::commands::import(&pool, &input).await?;
    println!("Imported {inserted} recipes");

    Ok(())
}

async fn filter(
    settings: Settings,
    query: String,
    max_calories: i64,
    allergens: Vec<String>,
) -> Result<()> {
    let pool = db::init_pool(&settings.database.url).await?;
    db::run_migrations(&pool).await?;

    let synonyms = SynonymMap::from_file(&settings.retrieval.synonyms_path).unwrap_or_else(|e| {
        warn!("Failed to load allergen synonyms: {}", e);
        SynonymMap::default()
    });

    larder::cli::commands::filter(&pool, &synonyms, &query, max_calories, &allergens).await
}
