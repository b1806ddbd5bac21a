use axum::{
    extract::{Json, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use super::common::ApiResponse;
use super::files::last_text;
use crate::core::models::StatusLevel;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ViewRequest {
    pub file: String,
}

/// 确认查看: 下载、渲染并清理
pub async fn view_file(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ViewRequest>,
) -> Response {
    let interaction = state.viewer.view(&req.file).await.interaction;
    if interaction.output.is_some() {
        return ApiResponse::ok(interaction).into_response();
    }

    let reason = interaction
        .messages
        .iter()
        .rev()
        .find(|m| matches!(m.level, StatusLevel::Error | StatusLevel::Warning))
        .map(|m| m.text.clone())
        .unwrap_or_else(|| last_text(&interaction.messages));
    ApiResponse::failed(interaction, reason).into_response()
}
