use blog_api::api::routes;
use blog_api::infrastructure::database;
use blog_api::{AppState, Config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables before the log filter reads RUST_LOG
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    // Connect to database
    tracing::info!(url = %config.database_url, "Connecting to database...");
    let pool = database::connect(&config.database_url, config.database_max_connections).await?;
    database::init_schema(&pool).await?;
    tracing::info!("Database ready");

    let state = AppState::new(pool, &config);
    state.avatars.ensure_dir().await?;

    let app = routes::router(state, &config);

    // Start server
    tracing::info!("Server listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
