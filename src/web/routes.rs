//! 页面路由定义

use super::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// 构建页面路由
pub fn build_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/view", post(handlers::load_model))
        .with_state(state)
}
