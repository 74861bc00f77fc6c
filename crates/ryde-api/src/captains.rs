use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::Value;
use tracing::{info, warn};

use ryde_crypto::generate_captain_token;
use ryde_types::api::{
    CaptainAuthResponse, LoginRequest, MessageResponse, RegisterCaptainRequest,
    UpdateLocationRequest, UpdateStatusRequest,
};
use ryde_types::models::{Captain, NewCaptain};
use ryde_types::validation::Validate;

use crate::error::ApiError;
use crate::middleware::Session;
use crate::rules;
use crate::{AppState, hash_blocking, verify_blocking};

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req: RegisterCaptainRequest = rules::parse(body, rules::CAPTAIN_REGISTRATION)?;

    let password_hash = hash_blocking(req.password).await?;
    let record = NewCaptain::new(req.fullname.into(), req.email, password_hash, req.vehicle.into());
    record.validate()?;

    let captain = state.db.create_captain(&record)?;
    let token = generate_captain_token(&state.tokens, captain.id, &captain.email, captain.status)?;
    info!("Registered captain {} ({})", captain.id, captain.vehicle.vehicle_type);

    Ok((StatusCode::CREATED, Json(CaptainAuthResponse { token, captain })))
}

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req: LoginRequest = rules::parse(body, rules::LOGIN)?;

    let creds = state
        .db
        .get_captain_credentials(&req.email)?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_blocking(req.password, creds.password_hash).await? {
        warn!("Failed login for captain {}", creds.account.id);
        return Err(ApiError::InvalidCredentials);
    }

    let captain = creds.account;
    let token = generate_captain_token(&state.tokens, captain.id, &captain.email, captain.status)?;
    Ok(Json(CaptainAuthResponse { token, captain }))
}

pub async fn profile(Extension(captain): Extension<Captain>) -> Json<Captain> {
    Json(captain)
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(captain): Extension<Captain>,
    Extension(session): Extension<Session>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.db.blacklist_token(&session.token, session.expires_at)?;
    info!("Captain {} logged out", captain.id);

    Ok(Json(MessageResponse {
        message: "Logged out".to_string(),
    }))
}

/// Toggle availability. Tokens already issued keep the status they were
/// signed with until they expire.
pub async fn update_status(
    State(state): State<AppState>,
    Extension(captain): Extension<Captain>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Captain>, ApiError> {
    let req: UpdateStatusRequest = rules::parse(body, rules::STATUS_UPDATE)?;
    let updated = state
        .db
        .set_captain_status(captain.id, req.status)?
        .ok_or(ApiError::NotFound)?;
    info!("Captain {} is now {}", updated.id, updated.status);

    Ok(Json(updated))
}

pub async fn update_location(
    State(state): State<AppState>,
    Extension(captain): Extension<Captain>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Captain>, ApiError> {
    let req: UpdateLocationRequest = rules::parse(body, rules::LOCATION_UPDATE)?;
    let updated = state
        .db
        .set_captain_location(captain.id, req.lat)?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(updated))
}
