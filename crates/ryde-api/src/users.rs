use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::Value;
use tracing::{info, warn};

use ryde_crypto::generate_user_token;
use ryde_types::api::{LoginRequest, MessageResponse, RegisterUserRequest, UserAuthResponse};
use ryde_types::models::{NewUser, User};
use ryde_types::validation::Validate;

use crate::error::ApiError;
use crate::middleware::Session;
use crate::rules;
use crate::{AppState, hash_blocking, verify_blocking};

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req: RegisterUserRequest = rules::parse(body, rules::USER_REGISTRATION)?;

    let password_hash = hash_blocking(req.password).await?;
    let record = NewUser {
        fullname: req.fullname.into(),
        email: req.email,
        password_hash,
    };
    record.validate()?;

    let user = state.db.create_user(&record)?;
    let token = generate_user_token(&state.tokens, user.id)?;
    info!("Registered user {}", user.id);

    Ok((StatusCode::CREATED, Json(UserAuthResponse { token, user })))
}

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req: LoginRequest = rules::parse(body, rules::LOGIN)?;

    let creds = state
        .db
        .get_user_credentials(&req.email)?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_blocking(req.password, creds.password_hash).await? {
        warn!("Failed login for user {}", creds.account.id);
        return Err(ApiError::InvalidCredentials);
    }

    let user = creds.account;
    let token = generate_user_token(&state.tokens, user.id)?;
    Ok(Json(UserAuthResponse { token, user }))
}

pub async fn profile(Extension(user): Extension<User>) -> Json<User> {
    Json(user)
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Extension(session): Extension<Session>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.db.blacklist_token(&session.token, session.expires_at)?;
    info!("User {} logged out", user.id);

    Ok(Json(MessageResponse {
        message: "Logged out".to_string(),
    }))
}
