//! 测试用内存存储后端

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::core::error::StorageError;
use crate::core::models::{Credentials, RemoteNode, Session, ViewerConfig};
use crate::core::services::{SessionManager, ViewerService};
use crate::core::traits::StorageBackend;

pub(crate) const TRIANGLE_STL: &str = "solid t
facet normal 0 0 1
 outer loop
  vertex 0 0 0
  vertex 1 0 0
  vertex 0 1 0
 endloop
endfacet
endsolid t
";

/// 用 truck 建模一个单位立方体并导出为 STEP 文本
pub(crate) fn unit_cube_step() -> String {
    use truck_modeling::{builder, Point3, Vector3};
    use truck_stepio::out::{CompleteStepDisplay, StepHeaderDescriptor, StepModel};

    let vertex = builder::vertex(Point3::new(0.0, 0.0, 0.0));
    let edge = builder::tsweep(&vertex, Vector3::unit_x());
    let face = builder::tsweep(&edge, Vector3::unit_y());
    let cube = builder::tsweep(&face, Vector3::unit_z());
    CompleteStepDisplay::new(
        StepModel::from(&cube.compress()),
        StepHeaderDescriptor {
            organization_system: "cloud-cad-viewer".to_owned(),
            ..Default::default()
        },
    )
    .to_string()
}

#[derive(Default)]
pub(crate) struct MemoryBackend {
    pub files: Vec<(String, String, Vec<u8>)>,
    pub reject_login: bool,
    pub fail_download: bool,
    /// 下载时等待，放大并发交互的重叠窗口
    pub slow_download: bool,
    /// 下载时同目录内 cadview-* 文件数的最大值
    pub max_live_artifacts: AtomicUsize,
    pub logins: AtomicUsize,
    pub logouts: AtomicUsize,
    pub downloads: Mutex<Vec<(String, PathBuf)>>,
}

impl MemoryBackend {
    pub fn with_file(mut self, id: &str, name: &str, content: impl Into<Vec<u8>>) -> Self {
        self.files.push((id.to_string(), name.to_string(), content.into()));
        self
    }

    pub fn download_calls(&self) -> Vec<(String, PathBuf)> {
        self.downloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn login(&self, credentials: &Credentials) -> Result<Session, StorageError> {
        self.logins.fetch_add(1, Ordering::SeqCst);
        if self.reject_login {
            return Err(StorageError::InvalidCredentials("wrong password".into()));
        }
        Ok(Session::new("mem-token", credentials.email.clone()))
    }

    async fn list_files(&self, _: &Session) -> Result<Vec<RemoteNode>, StorageError> {
        Ok(self
            .files
            .iter()
            .map(|(id, name, _)| RemoteNode::new(id.clone(), name.clone()))
            .collect())
    }

    async fn download(
        &self,
        _: &Session,
        remote_id: &str,
        dest: &Path,
    ) -> Result<u64, StorageError> {
        self.downloads
            .lock()
            .unwrap()
            .push((remote_id.to_string(), dest.to_path_buf()));
        if let Some(dir) = dest.parent() {
            let live = std::fs::read_dir(dir)?
                .filter_map(Result::ok)
                .filter(|e| e.file_name().to_string_lossy().starts_with("cadview-"))
                .count();
            self.max_live_artifacts.fetch_max(live, Ordering::SeqCst);
        }
        if self.slow_download {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }
        if self.fail_download {
            return Err(StorageError::Network {
                kind: "connection",
                message: "connection reset".into(),
            });
        }
        let (_, _, content) = self
            .files
            .iter()
            .find(|(id, _, _)| id == remote_id)
            .ok_or_else(|| StorageError::NotFound(remote_id.to_string()))?;
        tokio::fs::write(dest, content).await?;
        Ok(content.len() as u64)
    }

    async fn logout(&self, _: &Session) -> Result<(), StorageError> {
        self.logouts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub(crate) fn creds() -> Option<Credentials> {
    Some(Credentials::new("me@example.com", "pw"))
}

/// 构建使用 `temp_dir` 的 ViewerService
pub(crate) fn viewer(backend: Arc<MemoryBackend>, temp_dir: &Path) -> ViewerService {
    let session = Arc::new(SessionManager::new(backend, creds()));
    let config = ViewerConfig {
        temp_dir: Some(temp_dir.to_path_buf()),
        ..ViewerConfig::default()
    };
    ViewerService::new(session, config)
}
