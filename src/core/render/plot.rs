//! Plotly mesh3d 图表

use serde_json::{json, Value};
use uuid::Uuid;

use crate::core::models::{Mesh, RenderConfig};

/// 构建 mesh3d 图表: 固定纯色、等比例坐标轴、零边距
pub fn build_figure(mesh: &Mesh, config: &RenderConfig) -> Value {
    let (x, y, z) = mesh.axis_columns();
    let (i, j, k) = mesh.face_columns();

    let axis = json!({ "visible": true, "showgrid": true, "zeroline": false });

    json!({
        "data": [{
            "type": "mesh3d",
            "x": x,
            "y": y,
            "z": z,
            "i": i,
            "j": j,
            "k": k,
            "color": config.mesh_color,
            "flatshading": false,
            "lighting": { "ambient": 0.5, "diffuse": 0.8, "specular": 0.2 },
            "hoverinfo": "skip",
        }],
        "layout": {
            "height": config.plot_height,
            "margin": { "l": 0, "r": 0, "t": 0, "b": 0 },
            "scene": {
                "aspectmode": "data",
                "xaxis": axis,
                "yaxis": axis,
                "zaxis": axis,
            },
            "showlegend": false,
        },
    })
}

/// 内联 HTML; plotly.js 在浏览器端从 CDN 加载
pub fn figure_html(figure: &Value, config: &RenderConfig) -> Result<String, serde_json::Error> {
    let div_id = format!("plot-{}", Uuid::new_v4().simple());
    // 防止 JSON 中出现 "</script>"
    let encoded = serde_json::to_string(figure)?.replace("</", "<\\/");

    Ok(format!(
        r#"<div id="{div_id}" class="plot" style="width:100%;height:{height}px;"></div>
<script src="{script}"></script>
<script>
  (function () {{
    var fig = {encoded};
    Plotly.newPlot("{div_id}", fig.data, fig.layout, {{ responsive: true, displaylogo: false }});
  }})();
</script>"#,
        height = config.plot_height,
        script = config.plotly_script_url,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Mesh {
        Mesh {
            vertices: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
            faces: vec![[0, 1, 2], [0, 2, 3]],
        }
    }

    #[test]
    fn figure_carries_every_vertex_and_face() {
        let figure = build_figure(&square(), &RenderConfig::default());
        let trace = &figure["data"][0];
        assert_eq!(trace["type"], "mesh3d");
        assert_eq!(trace["x"].as_array().unwrap().len(), 4);
        assert_eq!(trace["z"].as_array().unwrap().len(), 4);
        assert_eq!(trace["i"], json!([0, 0]));
        assert_eq!(trace["k"], json!([2, 3]));
        assert_eq!(trace["color"], "lightsteelblue");
    }

    #[test]
    fn layout_uses_data_aspect_and_zero_margin() {
        let figure = build_figure(&square(), &RenderConfig::default());
        let layout = &figure["layout"];
        assert_eq!(layout["scene"]["aspectmode"], "data");
        assert_eq!(layout["margin"], json!({ "l": 0, "r": 0, "t": 0, "b": 0 }));
    }

    #[test]
    fn html_loads_plotly_and_escapes_script_close() {
        let config = RenderConfig::default();
        let figure = json!({ "data": [], "layout": { "title": "</script>" } });
        let html = figure_html(&figure, &config).unwrap();
        assert!(html.contains(&config.plotly_script_url));
        assert!(html.contains("<\\/script>"));
        assert_eq!(html.matches("</script>").count(), 2);
    }
}
