use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Request to create a credential record. The password is hashed before this
/// struct is built; plaintext never reaches the database layer.
#[derive(Debug, Clone)]
pub struct UserCreateDBRequest {
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct UserDBResponse {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
