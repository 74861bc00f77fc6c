pub mod captains;
pub mod error;
pub mod middleware;
pub mod rules;
pub mod users;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, patch, post},
};
use tracing::error;

use ryde_crypto::TokenConfig;
use ryde_db::Database;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub tokens: TokenConfig,
}

/// All HTTP routes, with state attached. Transport layers (CORS, tracing)
/// are added by the binary.
pub fn router(state: AppState) -> Router {
    let user_routes = Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .merge(
            Router::new()
                .route("/profile", get(users::profile))
                .route("/logout", get(users::logout))
                .route_layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    middleware::require_user,
                )),
        );

    let captain_routes = Router::new()
        .route("/register", post(captains::register))
        .route("/login", post(captains::login))
        .merge(
            Router::new()
                .route("/profile", get(captains::profile))
                .route("/logout", get(captains::logout))
                .route("/status", patch(captains::update_status))
                .route("/location", patch(captains::update_location))
                .route_layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    middleware::require_captain,
                )),
        );

    Router::new()
        .nest("/users", user_routes)
        .nest("/captains", captain_routes)
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

// bcrypt work runs on the blocking pool.

pub(crate) async fn hash_blocking(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || ryde_crypto::hash_password(&password))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(e.to_string())
        })?
        .map_err(ApiError::from)
}

pub(crate) async fn verify_blocking(candidate: String, stored_hash: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || ryde_crypto::compare_password(&candidate, &stored_hash))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(e.to_string())
        })?
        .map_err(ApiError::from)
}
