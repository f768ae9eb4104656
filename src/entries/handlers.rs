use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use time::OffsetDateTime;
use tracing::instrument;

use crate::auth::jwt::AuthUser;
use crate::entries::dto::{EntryListResponse, EntryResponse, ListQuery, SubmitEntryRequest};
use crate::entries::service;
use crate::error::ApiError;
use crate::state::AppState;

#[instrument(skip(state, payload))]
pub async fn submit_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<SubmitEntryRequest>,
) -> Result<(StatusCode, Json<EntryResponse>), ApiError> {
    let entry = service::submit_entry(
        state.store.as_ref(),
        user_id,
        payload,
        OffsetDateTime::now_utc(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(entry.into())))
}

#[instrument(skip(state))]
pub async fn list_entries(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<EntryListResponse>, ApiError> {
    let entries = service::list_entries(state.store.as_ref(), user_id, query).await?;
    let data: Vec<EntryResponse> = entries.into_iter().map(EntryResponse::from).collect();
    let total_count = data.len();
    Ok(Json(EntryListResponse { data, total_count }))
}
