use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument, warn};

use crate::{error::ApiError, state::AppState};

use super::{
    dto::{LoginRequest, PublicUser, RegisterRequest, TokenResponse},
    jwt::{AuthUser, JwtKeys},
    password::{hash_password, verify_password},
    repo,
};

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    payload.username = payload.username.trim().to_string();

    if payload.username.is_empty() {
        warn!("registration with empty username");
        return Err(ApiError::Validation("Username must not be empty".into()));
    }
    if payload.password.is_empty() {
        warn!("registration with empty password");
        return Err(ApiError::Validation("Password must not be empty".into()));
    }

    if repo::find_by_username(&state.db, &payload.username)
        .await?
        .is_some()
    {
        warn!(username = %payload.username, "username already taken");
        return Err(ApiError::Conflict("Username already taken".into()));
    }

    let hash = hash_password(&payload.password)?;
    // The UNIQUE constraint is the backstop for a concurrent registration
    // racing past the lookup above; it still surfaces as a 409.
    let user = repo::create(&state.db, &payload.username, &hash).await?;

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(PublicUser {
            id: user.id,
            username: user.username,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Some(user) = repo::find_by_username(&state.db, &payload.username).await? else {
        warn!(username = %payload.username, "login with unknown username");
        return Err(ApiError::Unauthorized("User does not exist".into()));
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = user.id, "login with incorrect password");
        return Err(ApiError::Unauthorized("Incorrect password".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign(user.id)?;

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok(Json(TokenResponse { access_token }))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = repo::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User does not exist".into()))?;

    Ok(Json(PublicUser {
        id: user.id,
        username: user.username,
    }))
}
