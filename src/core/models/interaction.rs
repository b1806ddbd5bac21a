//! 单次交互 (选择 → 下载 → 渲染 → 清理) 的结果

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// 页面上显示的状态消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Success,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Error,
            text: text.into(),
        }
    }
}

/// 渲染产物
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderOutput {
    /// mesh3d 图表
    Plot {
        figure: serde_json::Value,
        html: String,
        vertex_count: usize,
        face_count: usize,
    },
    /// model-viewer 嵌入片段
    ModelViewer { source_path: PathBuf, html: String },
}

impl RenderOutput {
    pub fn html(&self) -> &str {
        match self {
            Self::Plot { html, .. } | Self::ModelViewer { html, .. } => html,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Interaction {
    pub id: Uuid,
    pub file: Option<String>,
    pub started_at: DateTime<Utc>,
    pub messages: Vec<StatusMessage>,
    pub output: Option<RenderOutput>,
    /// 是否在中途被终止 (登录/列表/空目录)
    pub halted: bool,
}

impl Interaction {
    pub fn new(file: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            file,
            started_at: Utc::now(),
            messages: Vec::new(),
            output: None,
            halted: false,
        }
    }

    pub fn push(&mut self, message: StatusMessage) {
        self.messages.push(message);
    }

    pub fn halt(&mut self, message: StatusMessage) {
        self.messages.push(message);
        self.halted = true;
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|m| m.level == StatusLevel::Error)
    }
}
