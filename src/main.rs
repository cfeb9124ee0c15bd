use portfolio_api::{
    AppState, auth,
    config::{AppConfig, Env},
    create_router,
    repository::{PostgresRepository, Repository, RepositoryState},
    storage::{S3StorageClient, StorageState},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// The asynchronous entry point, responsible for initializing all core
/// components: configuration, logging, database, admin seed, storage, and the
/// HTTP server.
#[tokio::main]
async fn main() {
    // Configuration & environment loading (fail-fast on missing prod secrets).
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // Logging filter: RUST_LOG wins, with sensible local defaults.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "portfolio_api=debug,tower_http=info,axum=trace".into());

    // Structured logging format selected by environment: pretty output for a
    // human at a terminal, JSON for log aggregators.
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // Database initialization.
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.db_url)
        .await
        .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("FATAL: Failed to run database migrations.");

    let repo = Arc::new(PostgresRepository::new(pool)) as RepositoryState;

    // Admin seeding: the single admin account must exist before login can work.
    ensure_admin(repo.as_ref(), &config).await;

    // Storage initialization (S3/MinIO).
    let s3_client = S3StorageClient::new(
        &config.s3_endpoint,
        &config.s3_region,
        &config.s3_key,
        &config.s3_secret,
        &config.s3_bucket,
    )
    .await;

    // LOCAL-ONLY: provision the MinIO bucket for the Dockerized setup.
    if config.env == Env::Local {
        use portfolio_api::storage::StorageService;
        s3_client.ensure_bucket_exists().await;
    }

    let storage = Arc::new(s3_client) as StorageState;

    let app_state = AppState {
        repo,
        storage,
        config,
    };

    let app = create_router(app_state);

    let listener = TcpListener::bind("0.0.0.0:3000")
        .await
        .expect("FATAL: Failed to bind 0.0.0.0:3000");

    tracing::info!("Listening on 0.0.0.0:3000");
    tracing::info!("API documentation (Swagger UI) at http://localhost:3000/swagger-ui");

    axum::serve(listener, app)
        .await
        .expect("FATAL: server error");
}

/// Creates the admin account from the configured credentials when it does not
/// exist yet. Idempotent across restarts; an existing account is left
/// untouched (including its password).
async fn ensure_admin(repo: &dyn Repository, config: &AppConfig) {
    let existing = repo
        .get_user_by_email(&config.admin_email)
        .await
        .expect("FATAL: admin lookup failed during seeding");

    if existing.is_some() {
        tracing::debug!("Admin user already present: {}", config.admin_email);
        return;
    }

    let password_hash = auth::hash_password(&config.admin_password)
        .expect("FATAL: failed to hash the admin password");

    repo.create_user(
        &config.admin_email,
        &password_hash,
        &config.admin_name,
        "admin",
    )
    .await
    .expect("FATAL: failed to seed the admin user");

    tracing::info!("Seeded admin user {}", config.admin_email);
}
