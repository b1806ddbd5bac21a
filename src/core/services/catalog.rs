//! 文件目录服务
//! 过滤远端列表，生成 名称 → 标识 的目录

use std::collections::HashMap;

use super::session::{SessionCallError, SessionManager};
use crate::core::error::CatalogError;
use crate::core::models::{Catalog, CatalogEntry, RemoteNode, SupportedFormat};

pub struct CatalogService;

impl CatalogService {
    /// 从后端拉取并过滤
    pub async fn list(session: &SessionManager) -> Result<Catalog, CatalogError> {
        let nodes = session.list_files().await.map_err(|e| match e {
            SessionCallError::Auth(e) => CatalogError::Auth(e),
            SessionCallError::Storage(e) => CatalogError::Listing(e),
        })?;
        let total = nodes.len();
        let catalog = Self::build(nodes);
        tracing::info!(
            "Catalog: {} viewable files out of {} remote records",
            catalog.len(),
            total
        );
        Ok(catalog)
    }

    /// 跳过缺少名称或标识的记录，只保留支持的扩展名。
    /// 重名条目全部保留，显示名追加 "[标识]" 以区分。
    pub fn build(nodes: Vec<RemoteNode>) -> Catalog {
        let mut entries: Vec<CatalogEntry> = nodes
            .into_iter()
            .filter_map(|node| {
                let (Some(id), Some(name)) = (node.id, node.name) else {
                    tracing::debug!("Skipping remote record without name or id");
                    return None;
                };
                if id.is_empty() || name.is_empty() {
                    return None;
                }
                let format = SupportedFormat::from_name(&name)?;
                Some(CatalogEntry {
                    display_name: name.clone(),
                    name,
                    remote_id: id,
                    format,
                })
            })
            .collect();

        let mut occurrences: HashMap<String, usize> = HashMap::new();
        for entry in &entries {
            *occurrences.entry(entry.name.clone()).or_default() += 1;
        }
        for entry in &mut entries {
            if occurrences.get(&entry.name).copied().unwrap_or(0) > 1 {
                entry.display_name = format!("{} [{}]", entry.name, entry.remote_id);
            }
        }

        entries.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        Catalog::from_sorted(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: Option<&str>, name: Option<&str>) -> RemoteNode {
        RemoteNode {
            id: id.map(String::from),
            name: name.map(String::from),
        }
    }

    #[test]
    fn keeps_only_supported_extensions() {
        let catalog = CatalogService::build(vec![
            RemoteNode::new("h1", "part1.stl"),
            RemoteNode::new("h2", "notes.txt"),
            RemoteNode::new("h3", "assembly.step"),
        ]);
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(names, vec!["assembly.step", "part1.stl"]);
        assert_eq!(catalog.lookup("part1.stl").unwrap().remote_id, "h1");
    }

    #[test]
    fn suffix_match_is_case_insensitive() {
        let catalog = CatalogService::build(vec![
            RemoteNode::new("a", "Bracket.OBJ"),
            RemoteNode::new("b", "scene.GLB"),
            RemoteNode::new("c", "stl"),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.lookup("Bracket.OBJ").unwrap().format,
            SupportedFormat::Obj
        );
    }

    #[test]
    fn skips_malformed_records() {
        let catalog = CatalogService::build(vec![
            node(None, Some("orphan.stl")),
            node(Some("x"), None),
            node(Some(""), Some("empty-id.stl")),
            node(Some("ok"), Some("fine.ply")),
        ]);
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(names, vec!["fine.ply"]);
    }

    #[test]
    fn duplicate_names_are_disambiguated() {
        let catalog = CatalogService::build(vec![
            RemoteNode::new("h1", "part.stl"),
            RemoteNode::new("h2", "part.stl"),
            RemoteNode::new("h3", "other.stl"),
        ]);
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(names, vec!["other.stl", "part.stl [h1]", "part.stl [h2]"]);
        assert_eq!(catalog.lookup("part.stl [h2]").unwrap().name, "part.stl");
        assert!(catalog.lookup("part.stl").is_none());
    }

    #[test]
    fn empty_listing_gives_empty_catalog() {
        assert!(CatalogService::build(vec![RemoteNode::new("h", "readme.md")]).is_empty());
    }
}
