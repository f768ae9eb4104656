use axum::extract::State;
use axum::Json;
use time::OffsetDateTime;
use tracing::instrument;

use crate::auth::jwt::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;
use crate::suggestions::dto::SuggestionResponse;
use crate::suggestions::service;

#[instrument(skip(state))]
pub async fn today(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<SuggestionResponse>, ApiError> {
    let outcome = service::request_suggestion(
        state.store.as_ref(),
        state.provider.as_ref(),
        &state.config.suggestion,
        user_id,
        OffsetDateTime::now_utc(),
    )
    .await?;
    Ok(Json(SuggestionResponse {
        suggestion: outcome.suggestion,
        already_received: outcome.already_received,
    }))
}
