use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub mod common;
mod files;
mod session;
mod view;

pub fn build_routes(state: Arc<AppState>) -> Router {
    Router::new()
        // Catalog
        .route("/api/files", get(files::list_files))
        // View (download + render)
        .route("/api/view", post(view::view_file))
        // Session lifecycle
        .route(
            "/api/session",
            get(session::get_session_status).delete(session::close_session),
        )
        // Health
        .route("/healthz", get(|| async { "ok" }))
        .with_state(state)
}
