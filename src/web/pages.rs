//! 服务端渲染的页面: 侧栏选择框 + 主区域状态消息与渲染结果

use crate::core::models::{Catalog, Interaction, StatusLevel, StatusMessage, SUPPORTED_EXTENSIONS};
use crate::core::render::escape_html;

const STYLE: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; color: #262730; }
.layout { display: flex; min-height: 100vh; }
aside { width: 300px; padding: 24px; background: #f0f2f6; box-sizing: border-box; }
main { flex: 1; padding: 24px 48px; min-width: 0; }
select, button { width: 100%; padding: 8px; margin-top: 8px; font-size: 14px; }
button { cursor: pointer; }
.msg { padding: 12px 16px; margin: 12px 0; border-radius: 6px; }
.msg.info { background: #e8f0fe; }
.msg.success { background: #e6f4ea; }
.msg.warning { background: #fef7e0; }
.msg.error { background: #fce8e6; }
code { background: #f0f2f6; padding: 1px 4px; border-radius: 3px; }
"#;

pub struct PageModel<'a> {
    pub title: &'a str,
    pub catalog: Option<&'a Catalog>,
    /// 预选的文件 (仅影响选择框)
    pub selected: Option<&'a str>,
    pub interaction: &'a Interaction,
}

pub fn render_page(model: &PageModel<'_>) -> String {
    let title = escape_html(model.title);
    let formats = SUPPORTED_EXTENSIONS
        .iter()
        .map(|ext| format!("<code>{ext}</code>"))
        .collect::<Vec<_>>()
        .join(", ");

    // 进度类消息放侧栏，其余放主区域
    let (sidebar_msgs, main_msgs): (Vec<&StatusMessage>, Vec<&StatusMessage>) = model
        .interaction
        .messages
        .iter()
        .partition(|m| m.level == StatusLevel::Info);

    let output = model
        .interaction
        .output
        .as_ref()
        .map(|o| o.html())
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
<div class="layout">
<aside>
<h2>Your Files</h2>
{selector}
{sidebar}
</aside>
<main>
<h1>{title}</h1>
<p>Browse and visualize your CAD models directly from cloud storage.<br>
Supported formats: {formats}</p>
{messages}
<section class="output">
{output}
</section>
</main>
</div>
</body>
</html>
"#,
        selector = render_selector(model.catalog, model.selected),
        sidebar = render_messages(&sidebar_msgs),
        messages = render_messages(&main_msgs),
    )
}

fn render_selector(catalog: Option<&Catalog>, selected: Option<&str>) -> String {
    let Some(catalog) = catalog else {
        return String::new();
    };

    let options = catalog
        .names()
        .map(|name| {
            let escaped = escape_html(name);
            let mark = if Some(name) == selected { " selected" } else { "" };
            format!(r#"<option value="{escaped}"{mark}>{escaped}</option>"#)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<form method="post" action="/view">
<label for="file">Select a file to view</label>
<select id="file" name="file">
{options}
</select>
<button type="submit">Load Model</button>
</form>"#
    )
}

fn render_messages(messages: &[&StatusMessage]) -> String {
    messages
        .iter()
        .map(|m| {
            let class = match m.level {
                StatusLevel::Info => "info",
                StatusLevel::Success => "success",
                StatusLevel::Warning => "warning",
                StatusLevel::Error => "error",
            };
            format!(
                r#"<div class="msg {class}" role="status">{}</div>"#,
                escape_html(&m.text)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::RemoteNode;
    use crate::core::services::CatalogService;

    #[test]
    fn selector_lists_catalog_and_marks_selection() {
        let catalog = CatalogService::build(vec![
            RemoteNode::new("1", "a.stl"),
            RemoteNode::new("2", "b <x>.obj"),
        ]);
        let interaction = Interaction::new(None);
        let html = render_page(&PageModel {
            title: "Viewer",
            catalog: Some(&catalog),
            selected: Some("a.stl"),
            interaction: &interaction,
        });

        assert!(html.contains(r#"<option value="a.stl" selected>a.stl</option>"#));
        assert!(html.contains("b &lt;x&gt;.obj"));
        assert!(html.contains("Load Model"));
    }

    #[test]
    fn halted_page_has_no_selector() {
        let mut interaction = Interaction::new(None);
        interaction.halt(StatusMessage::warning("No supported CAD files found in your account."));
        let html = render_page(&PageModel {
            title: "Viewer",
            catalog: None,
            selected: None,
            interaction: &interaction,
        });

        assert!(!html.contains("<select"));
        assert!(html.contains(r#"class="msg warning""#));
    }
}
