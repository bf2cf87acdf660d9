//! Piquante Server - Hot Sauce Review API
//!
//! A Rust REST API server for the Piquante sauce review application.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use piquante_server::{
    api,
    config::AppConfig,
    repository::Repository,
    services::Services,
    AppState,
};

/// Upper bound on multipart request bodies (image uploads)
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("piquante_server={},tower_http=debug", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Piquante Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(
        repository,
        config.auth.clone(),
        config.storage.clone(),
    );

    // Make sure the image directory exists before serving from it
    services.storage.init().await.expect("Failed to prepare image directory");

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Rate limits mirror the reference deployment: 100 requests per
    // 10 minutes on sauce routes, 50 per 10 minutes on auth routes.
    let sauces_governor = Box::new(
        GovernorConfigBuilder::default()
            .per_second(6)
            .burst_size(100)
            .finish()
            .expect("Invalid sauces rate limit configuration"),
    );
    let auth_governor = Box::new(
        GovernorConfigBuilder::default()
            .per_second(12)
            .burst_size(50)
            .finish()
            .expect("Invalid auth rate limit configuration"),
    );

    let sauce_routes = Router::new()
        .route("/", get(api::sauces::list_sauces).post(api::sauces::create_sauce))
        .route(
            "/:id",
            get(api::sauces::get_sauce)
                .put(api::sauces::update_sauce)
                .delete(api::sauces::delete_sauce),
        )
        .route("/:id/like", post(api::sauces::like_sauce))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(GovernorLayer {
            config: Box::leak(sauces_governor),
        });

    let auth_routes = Router::new()
        .route("/signup", post(api::auth::signup))
        .route("/login", post(api::auth::login))
        .layer(GovernorLayer {
            config: Box::leak(auth_governor),
        });

    let images_dir = state.config.storage.images_dir.clone();

    let api_routes = Router::new()
        .nest("/sauces", sauce_routes)
        .nest("/auth", auth_routes)
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api", api_routes)
        .nest_service("/images", ServeDir::new(images_dir))
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
