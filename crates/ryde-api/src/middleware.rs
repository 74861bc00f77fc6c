use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};
use tracing::debug;

use ryde_crypto::{decode_captain_token, decode_user_token};

use crate::AppState;
use crate::error::ApiError;

type BearerHeader = Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>;

/// The token a request was authenticated with, kept so logout can revoke it.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub expires_at: i64,
}

fn bearer_token(state: &AppState, header: BearerHeader) -> Result<String, ApiError> {
    let TypedHeader(Authorization(bearer)) = header.map_err(|_| ApiError::Unauthorized)?;
    let token = bearer.token().to_string();

    if state.db.is_token_blacklisted(&token)? {
        debug!("Rejected blacklisted token");
        return Err(ApiError::Unauthorized);
    }
    Ok(token)
}

/// Validate a rider token and attach the `User` and its `Session`.
pub async fn require_user(
    State(state): State<AppState>,
    header: BearerHeader,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&state, header)?;
    let claims = decode_user_token(&state.tokens, &token).map_err(|_| ApiError::Unauthorized)?;
    let user = state
        .db
        .get_user_by_id(claims.sub)?
        .ok_or(ApiError::Unauthorized)?;

    req.extensions_mut().insert(user);
    req.extensions_mut().insert(Session {
        token,
        expires_at: claims.exp,
    });
    Ok(next.run(req).await)
}

/// Validate a captain token and attach the `Captain` and its `Session`.
pub async fn require_captain(
    State(state): State<AppState>,
    header: BearerHeader,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&state, header)?;
    let claims = decode_captain_token(&state.tokens, &token).map_err(|_| ApiError::Unauthorized)?;
    let captain = state
        .db
        .get_captain_by_id(claims.sub)?
        .ok_or(ApiError::Unauthorized)?;

    req.extensions_mut().insert(captain);
    req.extensions_mut().insert(Session {
        token,
        expires_at: claims.exp,
    });
    Ok(next.run(req).await)
}
