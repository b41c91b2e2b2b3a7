//! Shared helpers for endpoint tests.

use crate::{Application, Config, db::handlers::Repository};
use axum_test::TestServer;
use base64::{Engine as _, engine::general_purpose};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::path::Path;
use tempfile::TempDir;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "test-admin-password";

/// Config pointing file storage at a throwaway directory.
pub fn create_test_config(storage_root: &Path) -> Config {
    let mut config = Config::default();
    config.admin_username = ADMIN_USERNAME.to_string();
    config.admin_password = Some(ADMIN_PASSWORD.to_string());
    config.storage.uploads_dir = storage_root.join("uploads");
    config.storage.templates_dir = storage_root.join("templates");
    config
}

/// Spin up a test server over the given pool. The returned [`TempDir`] owns
/// the storage directories and must outlive the server.
pub async fn create_test_app(pool: PgPool) -> (TestServer, TempDir) {
    let storage = tempfile::tempdir().expect("Failed to create storage tempdir");
    let config = create_test_config(storage.path());
    let app = Application::with_pool(config, pool)
        .await
        .expect("Failed to create application");
    (app.into_test_server(), storage)
}

/// `Authorization` header value for basic auth.
pub fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", general_purpose::STANDARD.encode(format!("{username}:{password}")))
}

pub async fn create_test_employee(pool: &PgPool, name: &str, hourly_rate: Decimal) {
    let mut conn = pool.acquire().await.unwrap();
    crate::db::handlers::Employees::new(&mut conn)
        .create(&crate::db::models::employees::EmployeeCreateDBRequest {
            name: name.to_string(),
            hourly_rate,
        })
        .await
        .unwrap();
}

pub async fn register_company(pool: &PgPool, name: &str, director: Option<&str>) {
    let mut conn = pool.acquire().await.unwrap();
    crate::db::handlers::LegalEntities::new(&mut conn)
        .register(name, director)
        .await
        .unwrap();
}

pub async fn ensure_doc_type(pool: &PgPool, doc_type: &str) {
    let mut conn = pool.acquire().await.unwrap();
    crate::db::handlers::DocTypes::new(&mut conn).ensure(doc_type).await.unwrap();
}
