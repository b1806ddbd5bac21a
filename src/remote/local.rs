//! 本地目录存储
//! 把一个目录当作账户使用，标识为相对路径 (以 '/' 分隔)

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

use crate::core::error::StorageError;
use crate::core::models::{Credentials, RemoteNode, Session};
use crate::core::traits::StorageBackend;

pub struct LocalDirStorage {
    root: PathBuf,
}

impl LocalDirStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// 相对路径 → 绝对路径; 拒绝 ".." 和绝对路径
    fn resolve(&self, remote_id: &str) -> Option<PathBuf> {
        let relative = Path::new(remote_id);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        (safe && !remote_id.is_empty()).then(|| self.root.join(relative))
    }
}

/// 递归列出 `root` 下的普通文件; 单个条目出错时记录并跳过
fn walk(root: &Path) -> std::io::Result<Vec<RemoteNode>> {
    let mut nodes = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if dir == root => return Err(e),
            Err(e) => {
                tracing::warn!("Skipping unreadable directory {:?}: {}", dir, e);
                continue;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {:?}: {}", dir, e);
                    continue;
                }
            };
            let path = entry.path();
            // 跟随符号链接取类型; 悬空链接在这里被跳过
            let metadata = match std::fs::metadata(&path) {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::debug!("Skipping {:?}: {}", path, e);
                    continue;
                }
            };

            if metadata.is_dir() {
                // 不进入符号链接目录，避免环
                if !entry.file_type().is_ok_and(|t| t.is_symlink()) {
                    pending.push(path);
                }
                continue;
            }
            if metadata.is_file() {
                nodes.push(node_for(root, &path));
            }
        }
    }

    Ok(nodes)
}

fn node_for(root: &Path, path: &Path) -> RemoteNode {
    let id = path.strip_prefix(root).ok().map(|p| {
        p.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    });
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string);
    RemoteNode { id, name }
}

#[async_trait]
impl StorageBackend for LocalDirStorage {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn login(&self, credentials: &Credentials) -> Result<Session, StorageError> {
        if credentials.email.trim().is_empty() {
            return Err(StorageError::InvalidCredentials("email is empty".to_string()));
        }
        if !self.root.is_dir() {
            return Err(StorageError::InvalidCredentials(format!(
                "storage directory {} does not exist",
                self.root.display()
            )));
        }
        Ok(Session::new(
            uuid::Uuid::new_v4().to_string(),
            credentials.email.clone(),
        ))
    }

    async fn list_files(&self, _session: &Session) -> Result<Vec<RemoteNode>, StorageError> {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || walk(&root))
            .await
            .map_err(|e| StorageError::Io(std::io::Error::other(e)))?
            .map_err(StorageError::Io)
    }

    async fn download(
        &self,
        _session: &Session,
        remote_id: &str,
        dest: &Path,
    ) -> Result<u64, StorageError> {
        let source = self
            .resolve(remote_id)
            .filter(|p| p.is_file())
            .ok_or_else(|| StorageError::NotFound(remote_id.to_string()))?;
        Ok(tokio::fs::copy(&source, dest).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new("t", "me@example.com")
    }

    #[tokio::test]
    async fn lists_nested_files_with_relative_ids() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("parts")).unwrap();
        std::fs::write(root.path().join("parts/gear.stl"), b"solid").unwrap();
        std::fs::write(root.path().join("readme.txt"), b"hi").unwrap();

        let storage = LocalDirStorage::new(root.path());
        let mut nodes = storage.list_files(&session()).await.unwrap();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));

        assert_eq!(
            nodes,
            vec![
                RemoteNode::new("parts/gear.stl", "gear.stl"),
                RemoteNode::new("readme.txt", "readme.txt"),
            ]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn dangling_links_are_skipped_not_fatal() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("part.stl"), b"solid").unwrap();
        std::os::unix::fs::symlink(root.path().join("gone.stl"), root.path().join("ghost.stl"))
            .unwrap();
        std::os::unix::fs::symlink(root.path(), root.path().join("loop")).unwrap();

        let storage = LocalDirStorage::new(root.path());
        let nodes = storage.list_files(&session()).await.unwrap();
        assert_eq!(nodes, vec![RemoteNode::new("part.stl", "part.stl")]);
    }

    #[tokio::test]
    async fn missing_root_fails_listing() {
        let storage = LocalDirStorage::new("/definitely/not/here");
        let result = storage.list_files(&session()).await;
        assert!(matches!(result, Err(StorageError::Io(_))));
    }

    #[tokio::test]
    async fn download_copies_bytes() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("a.obj"), b"v 0 0 0\n").unwrap();
        let dest = tempfile::NamedTempFile::new().unwrap();

        let storage = LocalDirStorage::new(root.path());
        let written = storage
            .download(&session(), "a.obj", dest.path())
            .await
            .unwrap();
        assert_eq!(written, 8);
        assert_eq!(std::fs::read(dest.path()).unwrap(), b"v 0 0 0\n");
    }

    #[tokio::test]
    async fn download_rejects_traversal() {
        let root = tempfile::tempdir().unwrap();
        let dest = tempfile::NamedTempFile::new().unwrap();
        let storage = LocalDirStorage::new(root.path());

        let result = storage.download(&session(), "../etc/passwd", dest.path()).await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn login_requires_existing_directory() {
        let storage = LocalDirStorage::new("/definitely/not/here");
        let result = storage
            .login(&Credentials::new("me@example.com", "pw"))
            .await;
        assert!(matches!(result, Err(StorageError::InvalidCredentials(_))));
    }
}
