use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{
    AppState,
    api::models::auth::{CurrentUser, LoginResponse, UserCreate, UserCreatedResponse},
    auth::password::{self, Argon2Params},
    db::{handlers::Repository, handlers::Users, models::users::UserCreateDBRequest},
    errors::Error,
};

/// Check basic-auth credentials
///
/// Verification happens in the auth middleware; reaching the handler means the
/// credentials in the `Authorization` header were valid.
#[utoipa::path(
    post,
    path = "/login",
    tag = "authentication",
    responses(
        (status = 200, description = "Credentials are valid", body = LoginResponse),
        (status = 401, description = "Missing or invalid credentials"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(Extension(current_user): Extension<CurrentUser>) -> Result<Json<LoginResponse>, Error> {
    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        username: current_user.username,
    }))
}

/// Create a new credential
#[utoipa::path(
    post,
    path = "/create_user",
    request_body = UserCreate,
    tag = "authentication",
    responses(
        (status = 201, description = "User created", body = UserCreatedResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Username already taken"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<UserCreate>,
) -> Result<(StatusCode, Json<UserCreatedResponse>), Error> {
    if request.username.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "Username must not be empty".to_string(),
        });
    }

    let password_config = &state.config.auth.password;
    if request.password.len() < password_config.min_length {
        return Err(Error::BadRequest {
            message: format!("Password must be at least {} characters", password_config.min_length),
        });
    }
    if request.password.len() > password_config.max_length {
        return Err(Error::BadRequest {
            message: format!("Password must be no more than {} characters", password_config.max_length),
        });
    }

    // Hash the password on a blocking thread to avoid blocking the async runtime
    let params = Argon2Params {
        memory_kib: password_config.argon2_memory_kib,
        iterations: password_config.argon2_iterations,
        parallelism: password_config.argon2_parallelism,
    };
    let password = request.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || password::hash_string_with_params(&password, Some(params)))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password hashing task: {e}"),
        })??;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let created = Users::new(&mut conn)
        .create(&UserCreateDBRequest {
            username: request.username.trim().to_string(),
            password_hash,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UserCreatedResponse {
            id: created.id,
            username: created.username,
        }),
    ))
}
