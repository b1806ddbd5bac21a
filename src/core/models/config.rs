//! 查看器配置模型

use std::path::PathBuf;

pub const PLOTLY_SCRIPT_URL: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
pub const MODEL_VIEWER_SCRIPT_URL: &str =
    "https://unpkg.com/@google/model-viewer/dist/model-viewer.min.js";

/// 查看器配置
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// 页面标题
    pub page_title: String,
    /// 临时文件目录 (None 时使用系统临时目录)
    pub temp_dir: Option<PathBuf>,
    pub render: RenderConfig,
}

/// 渲染配置
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// 网格的固定纯色
    pub mesh_color: String,
    pub plot_height: u32,
    pub plotly_script_url: String,
    pub model_viewer_script_url: String,
    /// model-viewer 外层容器高度
    pub embed_height: u32,
}

impl ViewerConfig {
    pub fn new() -> Self {
        Self {
            page_title: "Cloud CAD Viewer".to_string(),
            temp_dir: None,
            render: RenderConfig::default(),
        }
    }

    /// 实际使用的临时目录
    pub fn temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mesh_color: "lightsteelblue".to_string(),
            plot_height: 700,
            plotly_script_url: PLOTLY_SCRIPT_URL.to_string(),
            model_viewer_script_url: MODEL_VIEWER_SCRIPT_URL.to_string(),
            embed_height: 650,
        }
    }
}
