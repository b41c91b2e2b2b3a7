//! Basic-auth middleware applied uniformly to all protected routes.
//!
//! Credentials travel in the `Authorization: Basic` header and are verified
//! against the argon2 hash stored in the `users` table on every request. No
//! sessions or tokens: this is an internal backend behind a trusted network
//! edge, and the credential table is small.

use crate::{AppState, api::models::auth::CurrentUser, auth::password, db::handlers::Users, errors::Error};
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use base64::{Engine as _, engine::general_purpose};
use tracing::debug;

/// Parsed username/password from a `Basic` authorization header.
#[derive(Debug)]
struct BasicCredentials {
    username: String,
    password: String,
}

fn unauthenticated(message: &str) -> Error {
    Error::Unauthenticated {
        message: Some(message.to_string()),
    }
}

fn parse_basic_header(value: &str) -> Result<BasicCredentials, Error> {
    let encoded = value
        .strip_prefix("Basic ")
        .ok_or_else(|| unauthenticated("Basic authentication required"))?;

    let decoded = general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|_| unauthenticated("Malformed authorization header"))?;
    let decoded = String::from_utf8(decoded).map_err(|_| unauthenticated("Malformed authorization header"))?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or_else(|| unauthenticated("Malformed authorization header"))?;

    if username.is_empty() || password.is_empty() {
        return Err(unauthenticated("Authentication required"));
    }

    Ok(BasicCredentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Verify the basic-auth credentials and attach [`CurrentUser`] to the request.
pub async fn require_basic_auth(State(state): State<AppState>, mut request: Request, next: Next) -> Result<Response, Error> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unauthenticated("Authentication required"))?;

    let credentials = parse_basic_header(header)?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let user = Users::new(&mut conn)
        .get_by_username(&credentials.username)
        .await?
        .ok_or_else(|| unauthenticated("Invalid credentials"))?;

    // Argon2 verification is CPU-heavy; keep it off the async runtime
    let password = credentials.password;
    let hash = user.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || password::verify_string(&password, &hash))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password verification task: {e}"),
        })??;

    if !valid {
        return Err(unauthenticated("Invalid credentials"));
    }

    debug!(username = %user.username, "request authenticated");
    request.extensions_mut().insert(CurrentUser {
        id: user.id,
        username: user.username,
    });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(raw: &str) -> String {
        format!("Basic {}", general_purpose::STANDARD.encode(raw))
    }

    #[test]
    fn test_parse_valid_header() {
        let creds = parse_basic_header(&encode("alice:hunter2")).unwrap();
        assert_eq!(creds.username, "alice");
        assert_eq!(creds.password, "hunter2");
    }

    #[test]
    fn test_password_may_contain_colons() {
        let creds = parse_basic_header(&encode("alice:pa:ss:word")).unwrap();
        assert_eq!(creds.password, "pa:ss:word");
    }

    #[test]
    fn test_rejects_non_basic_schemes_and_garbage() {
        assert!(parse_basic_header("Bearer abc123").is_err());
        assert!(parse_basic_header("Basic not-base64!!").is_err());
        assert!(parse_basic_header(&encode("no-separator")).is_err());
        assert!(parse_basic_header(&encode(":empty-username")).is_err());
    }
}
