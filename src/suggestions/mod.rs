pub mod dto;
pub mod handlers;
pub mod provider;
pub mod service;

use axum::routing::post;
use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/suggestions/today", post(handlers::today))
}
