//! model-viewer 嵌入片段 (GLB / glTF)

use std::path::Path;

use super::escape_html;
use crate::core::models::RenderConfig;

/// 生成指向本地文件 (file://) 的 model-viewer 片段
pub fn model_viewer_html(path: &Path, config: &RenderConfig) -> String {
    let src = escape_html(&format!("file://{}", path.display()));
    format!(
        r#"<h3>GLB / GLTF Model Viewer:</h3>
<div class="embed" style="width:100%;height:{height}px;">
  <model-viewer src="{src}" camera-controls auto-rotate style="width:100%;height:600px;">
  </model-viewer>
  <script type="module" src="{script}"></script>
</div>"#,
        height = config.embed_height,
        script = config.model_viewer_script_url,
    )
}
