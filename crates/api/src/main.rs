use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use fitness_api::config::ServerConfig;
use fitness_api::engine::dispatcher::JobDispatcher;
use fitness_api::engine::import_worker::CatalogImportWorker;
use fitness_api::engine::registry::HandlerRegistry;
use fitness_api::engine::supervisor::JobSupervisor;
use fitness_api::router::build_app_router;
use fitness_api::state::AppState;
use fitness_catalog::{AssetCache, CatalogClient};
use fitness_core::async_job::JobType;
use fitness_db::store::{ExerciseStore, JobStore, PgStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fitness_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = fitness_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    fitness_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    fitness_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Job engine ---
    let store = Arc::new(PgStore::new(pool.clone()));
    let jobs: Arc<dyn JobStore> = store.clone();
    let exercises: Arc<dyn ExerciseStore> = store;

    let client = Arc::new(CatalogClient::new());
    let cache = Arc::new(AssetCache::new(Arc::clone(&client), &config.image_dir));
    tracing::info!(image_dir = %config.image_dir.display(), "Image cache configured");

    let mut handlers = HandlerRegistry::new();
    handlers.register(
        JobType::FetchCatalog,
        Arc::new(CatalogImportWorker::new(
            Arc::clone(&jobs),
            exercises,
            client,
            cache,
        )),
    );

    let supervisor = Arc::new(JobSupervisor::new(Arc::clone(&jobs)));
    let dispatcher = Arc::new(JobDispatcher::new(
        Arc::clone(&jobs),
        handlers,
        Arc::clone(&supervisor),
    ));

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        jobs,
        dispatcher,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, draining jobs");

    supervisor
        .shutdown(Duration::from_secs(config.shutdown_timeout_secs))
        .await;

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
