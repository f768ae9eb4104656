use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::Json;
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

use crate::auth::dto::{
    AuthResponse, DeleteAccountRequest, LoginRequest, PublicUser, RefreshRequest, RegisterRequest,
};
use crate::auth::jwt::{AuthUser, JwtKeys};
use crate::auth::service;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::User;

async fn auth_response(state: &AppState, user: User) -> Result<AuthResponse, ApiError> {
    let keys = JwtKeys::from_ref(state);
    let access_token = keys.sign_access(user.id).map_err(ApiError::Internal)?;
    let refresh_token = keys.sign_refresh(user.id).map_err(ApiError::Internal)?;
    let profile_completed = state
        .store
        .get_profile(user.id)
        .await?
        .map(|p| p.completed)
        .unwrap_or(false);
    Ok(AuthResponse {
        access_token,
        refresh_token,
        profile_completed,
        user: user.into(),
    })
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let user = service::register(state.store.as_ref(), payload, OffsetDateTime::now_utc()).await?;
    let response = auth_response(&state, user).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = service::login(state.store.as_ref(), &payload.login, &payload.password).await?;
    Ok(Json(auth_response(&state, user).await?))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|_| ApiError::InvalidCredentials)?;

    let user = load_user(&state, claims.sub).await?;
    Ok(Json(auth_response(&state, user).await?))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = load_user(&state, user_id).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn delete_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<DeleteAccountRequest>,
) -> Result<StatusCode, ApiError> {
    service::delete_account(state.store.as_ref(), user_id, &payload.password).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn load_user(state: &AppState, user_id: Uuid) -> Result<User, ApiError> {
    state
        .store
        .find_user(user_id)
        .await?
        .ok_or(ApiError::NotFound("user"))
}
