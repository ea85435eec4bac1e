pub mod error;
pub mod routes;
pub mod state;

use axum::{extract::DefaultBodyLimit, routing::{get, post}, Router};
use crate::adapters::http::state::HttpState;

pub fn router(state: HttpState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/api", get(routes::root))
        .route("/api/config", get(routes::get_config))
        .route("/api/models", get(routes::list_models))
        .route("/api/change_model", post(routes::change_model))
        .route("/api/process_image", post(routes::process_image))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
