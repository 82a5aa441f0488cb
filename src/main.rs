use std::net::SocketAddr;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use oxl_location_server::routes::{
    dashboard_page, get_users, health_check, login, logout, store_location,
};
use oxl_location_server::ws::{start_heartbeat, ws_handler};
use oxl_location_server::{db, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "oxl_location_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting OXL Location Server...");

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "Environment: {}, Server: {}",
        config.environment,
        config.server_address()
    );

    // Create database connection pool and the append-only logs
    let pool = db::create_pool(&config.database_url).await?;
    db::init_schema(&pool).await?;

    // Configure CORS
    let cors = if config.allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(
                config
                    .allowed_origins
                    .iter()
                    .map(|s| s.parse().unwrap())
                    .collect::<Vec<_>>(),
            )
            .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
            .allow_headers(Any)
    };

    // Create app state
    let state = AppState::new(pool, config.clone());

    // Keep idle WebSocket connections alive
    start_heartbeat(state.hub.clone());

    // Build router
    let app = Router::new()
        .route_service("/", ServeFile::new("static/location_sender.html"))
        .route("/login", post(login))
        .route("/logout", get(logout))
        .route("/dashboard", get(dashboard_page))
        .route("/store_location", post(store_location))
        .route("/get_users", get(get_users))
        .route("/health", get(health_check))
        .route("/ws", get(ws_handler))
        .nest_service("/static", ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.server_address().parse()?;
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
