//! 渲染分发
//! 按扩展名选择网格绘图或 model-viewer 嵌入

mod embed;
mod plot;

pub use embed::model_viewer_html;
pub use plot::{build_figure, figure_html};

use std::path::Path;

use crate::core::error::RenderError;
use crate::core::mesh;
use crate::core::models::{RenderConfig, RenderOutput, RenderPath, SupportedFormat};

/// 渲染分发结果
#[derive(Debug)]
pub enum RenderOutcome {
    Rendered(RenderOutput),
    /// 不在分发表内的扩展名，不做任何渲染
    Unsupported(String),
}

/// 渲染服务
pub struct RenderService;

impl RenderService {
    pub async fn render(
        path: &Path,
        extension: &str,
        config: &RenderConfig,
    ) -> Result<RenderOutcome, RenderError> {
        let Some(format) = SupportedFormat::from_extension(extension) else {
            return Ok(RenderOutcome::Unsupported(extension.to_string()));
        };

        match format.render_path() {
            RenderPath::Mesh => Self::render_mesh(path, format, config).await,
            RenderPath::WebComponent => {
                tracing::debug!("Embedding model-viewer for {:?}", path);
                Ok(RenderOutcome::Rendered(RenderOutput::ModelViewer {
                    source_path: path.to_path_buf(),
                    html: model_viewer_html(path, config),
                }))
            }
        }
    }

    async fn render_mesh(
        path: &Path,
        format: SupportedFormat,
        config: &RenderConfig,
    ) -> Result<RenderOutcome, RenderError> {
        let owned = path.to_path_buf();
        let mesh = tokio::task::spawn_blocking(move || mesh::load_mesh(&owned, format))
            .await
            .map_err(|e| RenderError::Task(e.to_string()))??;

        tracing::info!(
            "Parsed {:?}: {} vertices, {} faces",
            path,
            mesh.vertex_count(),
            mesh.face_count()
        );

        let figure = build_figure(&mesh, config);
        let html = figure_html(&figure, config)?;
        Ok(RenderOutcome::Rendered(RenderOutput::Plot {
            figure,
            html,
            vertex_count: mesh.vertex_count(),
            face_count: mesh.face_count(),
        }))
    }
}

/// 转义 HTML 文本与属性值
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
