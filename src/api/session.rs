use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::common::ApiResponse;
use crate::state::AppState;

pub async fn get_session_status(State(state): State<Arc<AppState>>) -> Response {
    ApiResponse::ok(state.session.status().await).into_response()
}

/// 退出登录; 下次交互时重新登录
pub async fn close_session(State(state): State<Arc<AppState>>) -> Response {
    state.session.dispose().await;
    ApiResponse::ok(state.session.status().await).into_response()
}
