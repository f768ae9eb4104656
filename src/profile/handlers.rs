use axum::extract::State;
use axum::Json;
use time::OffsetDateTime;
use tracing::instrument;

use crate::auth::jwt::AuthUser;
use crate::error::ApiError;
use crate::profile::dto::{CompleteProfileRequest, ProfileResponse};
use crate::profile::service;
use crate::state::AppState;

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let response = service::find_profile(state.store.as_ref(), user_id)
        .await?
        .map(ProfileResponse::from)
        .unwrap_or_else(|| ProfileResponse::shell(user_id));
    Ok(Json(response))
}

#[instrument(skip(state, payload))]
pub async fn complete_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CompleteProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = service::complete_profile(
        state.store.as_ref(),
        user_id,
        payload,
        OffsetDateTime::now_utc(),
        state.config.suggestion.day_boundary_offset,
    )
    .await?;
    Ok(Json(profile.into()))
}
