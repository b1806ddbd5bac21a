//! 下载阶段
//! 每次交互创建一个唯一命名的临时文件，离开作用域即删除

use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::session::{SessionCallError, SessionManager};
use crate::core::error::TransferError;
use crate::core::models::CatalogEntry;

const TEMP_PREFIX: &str = "cadview-";

/// 本地临时文件，独占于当前交互
#[derive(Debug)]
pub struct TempArtifact {
    file: NamedTempFile,
    extension: &'static str,
}

impl TempArtifact {
    /// 在 `dir` 中创建带扩展名后缀的新文件，从不覆盖已有文件
    pub fn create(dir: &Path, extension: &'static str) -> std::io::Result<Self> {
        let file = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(extension)
            .tempfile_in(dir)?;
        Ok(Self { file, extension })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn extension(&self) -> &'static str {
        self.extension
    }

    /// 显式删除并报告结果; 不调用时在 drop 中静默删除
    pub fn close(self) -> std::io::Result<PathBuf> {
        let path = self.file.path().to_path_buf();
        self.file.close()?;
        tracing::debug!("Removed temporary file {:?}", path);
        Ok(path)
    }
}

pub struct TransferService;

impl TransferService {
    /// 下载目录条目到新的临时文件; 失败时临时文件随返回值一起删除
    pub async fn fetch(
        session: &SessionManager,
        entry: &CatalogEntry,
        temp_dir: &Path,
    ) -> Result<TempArtifact, TransferError> {
        let artifact =
            TempArtifact::create(temp_dir, entry.extension()).map_err(TransferError::TempFile)?;

        tracing::info!(
            "Downloading {} ({}) to {:?}",
            entry.name,
            entry.remote_id,
            artifact.path()
        );
        let bytes = session
            .download(&entry.remote_id, artifact.path())
            .await
            .map_err(|e| match e {
                SessionCallError::Auth(e) => TransferError::Auth(e),
                SessionCallError::Storage(e) => TransferError::Download(e),
            })?;
        tracing::info!("Downloaded {} bytes for {}", bytes, entry.name);

        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifacts_are_unique_and_suffixed() {
        let dir = tempfile::tempdir().unwrap();
        let a = TempArtifact::create(dir.path(), ".stl").unwrap();
        let b = TempArtifact::create(dir.path(), ".stl").unwrap();

        assert_ne!(a.path(), b.path());
        assert!(a.path().to_string_lossy().ends_with(".stl"));
        assert!(a
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(TEMP_PREFIX));
    }

    #[test]
    fn drop_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = TempArtifact::create(dir.path(), ".glb").unwrap();
        let path = artifact.path().to_path_buf();
        assert!(path.exists());
        drop(artifact);
        assert!(!path.exists());
    }

    #[test]
    fn close_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = TempArtifact::create(dir.path(), ".obj").unwrap();
        let path = artifact.close().unwrap();
        assert!(!path.exists());
    }
}
