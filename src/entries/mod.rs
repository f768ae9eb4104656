pub mod dto;
pub mod handlers;
pub mod service;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/entries",
        get(handlers::list_entries).post(handlers::submit_entry),
    )
}
