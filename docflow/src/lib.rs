//! # docflow: document-management backend
//!
//! `docflow` is a small internal backend for a document-management workflow. It
//! stores fillable document templates per legal entity and document type, fills
//! placeholder text in those templates, records finalized documents with a
//! sequential per-month number, and answers payroll helper queries (salary with
//! VAT, working-day ranges against the Russian federal holiday calendar).
//!
//! The HTTP layer is [Axum](https://github.com/tokio-rs/axum); PostgreSQL holds
//! all persistent state and migrations run automatically on startup. Every
//! business route requires basic-auth credentials verified against the `users`
//! table; interactive API documentation is served at `/docs`.
//!
//! ## Quick start
//!
//! ```no_run
//! use clap::Parser;
//! use docflow::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = docflow::config::Args::parse();
//!     let config = Config::load(&args)?;
//!     docflow::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod documents;
pub mod errors;
mod openapi;
pub mod storage;
pub mod telemetry;
pub mod workdays;

#[cfg(test)]
mod test;

use crate::{
    auth::{middleware::require_basic_auth, password},
    db::handlers::{Settings, Users},
    openapi::ApiDoc,
    storage::FileStore,
};
use axum::{
    Json, Router,
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use bon::Builder;
pub use config::{Config, CorsOrigin};
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

/// Application state shared across all request handlers.
#[derive(Clone, Builder)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub db: PgPool,
    /// Application configuration
    pub config: Config,
    /// File store for uploads and templates
    pub files: Arc<FileStore>,
}

/// Get the docflow database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Create or refresh the initial admin credential.
///
/// Idempotent: when a password is configured the credential is upserted, so a
/// changed config password takes effect on restart. Without a configured
/// password an existing credential is left alone; if none exists, startup
/// fails rather than coming up with no way to authenticate.
#[instrument(skip(password, db))]
pub async fn create_initial_user(username: &str, password: Option<&str>, db: &PgPool) -> anyhow::Result<()> {
    let mut conn = db.acquire().await?;
    let mut users = Users::new(&mut conn);

    match password {
        Some(password) => {
            let password = password.to_string();
            let hash = tokio::task::spawn_blocking(move || password::hash_string(&password)).await??;
            users.upsert(username, &hash).await?;
            info!(username, "initial admin credential ensured");
        }
        None => {
            if users.get_by_username(username).await?.is_none() {
                anyhow::bail!(
                    "no credential '{username}' exists and no admin_password is configured; \
                     set admin_password so the service can be reached"
                );
            }
        }
    }

    Ok(())
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = Vec::new();
    for origin in &config.cors.allowed_origins {
        let header_value = match origin {
            CorsOrigin::Wildcard => "*".parse::<HeaderValue>()?,
            CorsOrigin::Url(url) => url.as_str().parse::<HeaderValue>()?,
        };
        origins.push(header_value);
    }

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(config.cors.allow_credentials))
}

/// Build the application router: basic-auth protected business routes plus the
/// public health and documentation surface.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let protected = Router::new()
        .route("/login", post(api::handlers::auth::login))
        .route("/create_user", post(api::handlers::auth::create_user))
        .route("/get_template", post(api::handlers::templates::get_template))
        .route("/create_template", post(api::handlers::templates::create_template))
        .route("/process_document", post(api::handlers::documents::process_document))
        .route("/add_signed_document", post(api::handlers::documents::add_signed_document))
        .route("/calculate_salary", post(api::handlers::payroll::calculate_salary))
        .route("/working_days", post(api::handlers::payroll::working_days))
        .route_layer(from_fn_with_state(state.clone(), require_basic_auth));

    let public = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    let cors = create_cors_layer(&state.config)?;

    Ok(protected
        .merge(public)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        ))
}

/// The assembled application: router, state and the owning connection pool.
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance: connect, migrate, seed, build router.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        tracing::debug!("Starting docflow with configuration: {:#?}", config);

        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
            .connect(&config.database.url)
            .await?;

        migrator().run(&pool).await?;

        Self::with_pool(config, pool).await
    }

    /// Build on an existing (already migrated) pool. Used by tests, where
    /// `#[sqlx::test]` owns the database lifecycle.
    pub async fn with_pool(config: Config, pool: PgPool) -> anyhow::Result<Self> {
        create_initial_user(&config.admin_username, config.admin_password.as_deref(), &pool).await?;

        let mut conn = pool.acquire().await?;
        Settings::new(&mut conn).ensure(config.payroll.default_vat_rate).await?;
        drop(conn);

        let state = AppState::builder()
            .db(pool.clone())
            .config(config.clone())
            .files(Arc::new(FileStore::new(&config.storage)))
            .build();

        let router = build_router(state)?;

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router.into_make_service()).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("docflow listening on http://{bind_addr}");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}
