use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::api::errors::ApiError;
use crate::api::handlers::{json_body, non_blank, MessageResponse};
use crate::api::middleware::AuthUser;
use crate::auth::jwt::create_token;
use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::auth::AuthConfig;
use crate::domain::errors::RepositoryError;
use crate::domain::repositories::user_repository::{NewUser, UserRepository};
use crate::domain::user::{PersonName, Username};
use crate::infrastructure::avatar_store::{AvatarFile, AvatarStore};
use crate::infrastructure::repositories::SqliteUserRepository;

const SIGNUP_FIELDS_REQUIRED: &str =
    "Username, password, first_name and last_name are required.";
const LOGIN_FIELDS_REQUIRED: &str = "Username and password are required.";
const INVALID_CREDENTIALS: &str = "Invalid credentials.";

/// Multipart fields accepted by signup
#[derive(Debug, Default)]
struct SignupForm {
    username: Option<String>,
    password: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    avatar: Option<AvatarFile>,
}

/// Response from successful signup
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: &'static str,
    pub user_id: i64,
    pub avatar: Option<String>,
}

/// Request body for user login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Response from successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
    pub avatar: Option<String>,
}

/// Response from a token check
#[derive(Debug, Serialize)]
pub struct TokenCheckResponse {
    pub message: &'static str,
    pub user_id: String,
}

async fn read_signup_form(mut multipart: Multipart) -> Result<SignupForm, ApiError> {
    let mut form = SignupForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(e.status(), e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "avatar" => {
                let file_name = field.file_name().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::new(e.status(), e.body_text()))?;
                form.avatar = Some(AvatarFile {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            "username" | "password" | "first_name" | "last_name" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::new(e.status(), e.body_text()))?;
                let slot = match name.as_str() {
                    "username" => &mut form.username,
                    "password" => &mut form.password,
                    "first_name" => &mut form.first_name,
                    _ => &mut form.last_name,
                };
                *slot = Some(value);
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Register a new user
///
/// POST /signup (multipart form)
pub async fn signup(
    State(pool): State<SqlitePool>,
    State(auth): State<AuthConfig>,
    State(avatars): State<AvatarStore>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    let multipart = multipart.map_err(|_| ApiError::bad_request(SIGNUP_FIELDS_REQUIRED))?;
    let form = read_signup_form(multipart).await?;

    let (Some(username), Some(password), Some(first_name), Some(last_name)) = (
        non_blank(form.username),
        non_blank(form.password),
        non_blank(form.first_name),
        non_blank(form.last_name),
    ) else {
        return Err(ApiError::bad_request(SIGNUP_FIELDS_REQUIRED));
    };

    let username = Username::new(username).map_err(ApiError::bad_request)?;
    let first_name = PersonName::new(first_name, "first_name").map_err(ApiError::bad_request)?;
    let last_name = PersonName::new(last_name, "last_name").map_err(ApiError::bad_request)?;

    let user_repo = SqliteUserRepository::new(pool);
    if user_repo.find_by_username(username.as_str()).await?.is_some() {
        return Err(ApiError::conflict("User already exists."));
    }

    let password_hash = hash_password_blocking(password, auth.bcrypt_cost())
        .await
        .map_err(|e| ApiError::internal(format!("Failed to hash password: {}", e)))?;

    let avatar = avatars.store(form.avatar).await?;

    let new_user = NewUser {
        username: username.clone(),
        password_hash,
        first_name,
        last_name,
        avatar: avatar.file_name().map(str::to_string),
    };

    let user_id = match user_repo.create(new_user).await {
        Ok(id) => id,
        Err(e) => {
            if let Some(name) = avatar.file_name() {
                avatars.remove(name).await;
            }
            return Err(match e {
                RepositoryError::Conflict(_) => ApiError::conflict("User already exists."),
                other => other.into(),
            });
        }
    };

    tracing::info!(user_id, username = %username, "User created");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created successfully.",
            user_id,
            avatar: avatar.file_name().map(str::to_string),
        }),
    ))
}

/// Login with username and password
///
/// POST /login
pub async fn login(
    State(pool): State<SqlitePool>,
    State(auth): State<AuthConfig>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let req = json_body(payload, LOGIN_FIELDS_REQUIRED)?;
    let (Some(username), Some(password)) = (req.username, req.password) else {
        return Err(ApiError::bad_request(LOGIN_FIELDS_REQUIRED));
    };

    let user_repo = SqliteUserRepository::new(pool);
    let Some(user) = user_repo.find_by_username(&username).await? else {
        tracing::warn!(username = %username, "Login for unknown user");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    let valid = verify_password_blocking(password, user.password_hash.clone())
        .await
        .map_err(|e| ApiError::internal(format!("Password verification failed: {}", e)))?;

    if !valid {
        tracing::warn!(user_id = user.id, "Login with wrong password");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = create_token(user.id, &user.username, auth.jwt_secret())?;

    Ok(Json(LoginResponse {
        message: "Login successful.",
        token,
        avatar: user.avatar,
    }))
}

/// Acknowledge a logout; tokens are stateless so the client discards its own
///
/// POST /logout
pub async fn logout(user: AuthUser) -> Json<MessageResponse> {
    tracing::info!(user_id = user.user_id, "User logged out");
    MessageResponse::new("Logged out successfully.")
}

/// Confirm that a token is valid and its user still exists
///
/// POST /token/check
pub async fn check_token(
    State(pool): State<SqlitePool>,
    user: AuthUser,
) -> Result<Json<TokenCheckResponse>, ApiError> {
    let user_repo = SqliteUserRepository::new(pool);
    let user = user_repo
        .find_by_id(user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Invalid token."))?;

    Ok(Json(TokenCheckResponse {
        message: "Valid token",
        user_id: user.username,
    }))
}

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
