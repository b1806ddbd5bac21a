//! 远端文件与目录模型

use serde::Serialize;

/// 允许查看的扩展名
pub const SUPPORTED_EXTENSIONS: [&str; 6] = [".stl", ".obj", ".ply", ".step", ".glb", ".gltf"];

/// 渲染路径
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderPath {
    /// 本地解析网格后绘图
    Mesh,
    /// 浏览器内 model-viewer 组件
    WebComponent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportedFormat {
    Stl,
    Obj,
    Ply,
    Step,
    Glb,
    Gltf,
}

impl SupportedFormat {
    /// 根据文件名 (不区分大小写) 的后缀识别格式
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        SUPPORTED_EXTENSIONS
            .iter()
            .find(|ext| lower.ends_with(*ext))
            .and_then(|ext| Self::from_extension(ext))
    }

    /// 接受 ".stl" 或 "stl"
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "stl" => Some(Self::Stl),
            "obj" => Some(Self::Obj),
            "ply" => Some(Self::Ply),
            "step" => Some(Self::Step),
            "glb" => Some(Self::Glb),
            "gltf" => Some(Self::Gltf),
            _ => None,
        }
    }

    /// 带点的扩展名，用作临时文件后缀
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Stl => ".stl",
            Self::Obj => ".obj",
            Self::Ply => ".ply",
            Self::Step => ".step",
            Self::Glb => ".glb",
            Self::Gltf => ".gltf",
        }
    }

    pub const fn render_path(&self) -> RenderPath {
        match self {
            Self::Stl | Self::Obj | Self::Ply | Self::Step => RenderPath::Mesh,
            Self::Glb | Self::Gltf => RenderPath::WebComponent,
        }
    }
}

/// 后端返回的原始列表记录，属性可能缺失
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteNode {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl RemoteNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
        }
    }
}

/// 目录条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    /// 选择框中显示的名字，目录内唯一
    pub display_name: String,
    /// 远端原始文件名
    pub name: String,
    pub remote_id: String,
    pub format: SupportedFormat,
}

impl CatalogEntry {
    pub fn extension(&self) -> &'static str {
        self.format.extension()
    }
}

/// 过滤后的可查看文件目录，按显示名排序
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub(crate) fn from_sorted(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.display_name.as_str())
    }

    pub fn lookup(&self, display_name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.display_name == display_name)
    }
}
