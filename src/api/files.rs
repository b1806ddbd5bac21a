use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

use super::common::{into_response, ApiResponse};
use crate::core::models::{CatalogEntry, StatusMessage};
use crate::state::AppState;

#[derive(Serialize)]
pub struct FilesResponse {
    pub files: Vec<CatalogEntry>,
}

/// 列出可查看的文件 (不会触发下载)
pub async fn list_files(State(state): State<Arc<AppState>>) -> Response {
    let browse = state.viewer.browse().await;
    match browse.catalog {
        Some(catalog) => into_response(Ok(FilesResponse {
            files: catalog.entries().to_vec(),
        })),
        None => {
            let reason = last_text(&browse.interaction.messages);
            ApiResponse::failed(browse.interaction.messages, reason).into_response()
        }
    }
}

pub(super) fn last_text(messages: &[StatusMessage]) -> String {
    messages
        .last()
        .map(|m| m.text.clone())
        .unwrap_or_else(|| "unknown error".to_string())
}
