use item_lending::{
    adapters::mock::{ItemCatalog as MockItemCatalog, UserDirectory as MockUserDirectory},
    adapters::postgres::PostgresBookingStore,
    api::{handlers::AppState, router::create_router},
    application::booking::ServiceDependencies,
    config::AppConfig,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "item_lending=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();

    // Initialize database connection pool
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .inspect_err(|e| tracing::error!("Failed to connect to database: {}", e))?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    // Users and items are owned by other services; the in-memory adapters
    // stand in for them until those clients exist.
    let service_deps = ServiceDependencies {
        booking_store: Arc::new(PostgresBookingStore::new(pool)),
        user_directory: Arc::new(MockUserDirectory::new()),
        item_catalog: Arc::new(MockItemCatalog::new()),
    };

    // Create application state
    let app_state = Arc::new(AppState { service_deps });

    // Create router
    let app = create_router(app_state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
