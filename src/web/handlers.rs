//! 页面处理器

use axum::{
    extract::{Form, Query, State},
    response::Html,
};
use serde::Deserialize;
use std::sync::Arc;

use super::pages::{render_page, PageModel};
use crate::state::AppState;

/// 选择参数 (表单或查询串)
#[derive(Debug, Deserialize)]
pub struct FileSelection {
    pub file: Option<String>,
}

/// 首页: 登录并列出文件。`?file=` 只预选，不下载
pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(selection): Query<FileSelection>,
) -> Html<String> {
    let browse = state.viewer.browse().await;
    Html(render_page(&PageModel {
        title: &state.config().page_title,
        catalog: browse.catalog.as_ref(),
        selected: selection.file.as_deref(),
        interaction: &browse.interaction,
    }))
}

/// "Load Model" 按钮: 下载并渲染所选文件
pub async fn load_model(
    State(state): State<Arc<AppState>>,
    Form(selection): Form<FileSelection>,
) -> Html<String> {
    let Some(file) = selection.file.filter(|f| !f.is_empty()) else {
        return index(State(state), Query(FileSelection { file: None })).await;
    };

    let run = state.viewer.view(&file).await;
    Html(render_page(&PageModel {
        title: &state.config().page_title,
        catalog: run.catalog.as_ref(),
        selected: Some(&file),
        interaction: &run.interaction,
    }))
}
