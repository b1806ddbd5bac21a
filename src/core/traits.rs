//! 核心 trait 定义
//! 用于解耦业务逻辑与具体的远端存储实现

use async_trait::async_trait;
use std::path::Path;

use crate::core::error::StorageError;
use crate::core::models::{Credentials, RemoteNode, Session};

/// 远端存储后端
/// HTTP 模式下使用 `HttpStorageClient`
/// 本地目录模式下使用 `LocalDirStorage`
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// 后端名称 (用于日志和状态展示)
    fn name(&self) -> &'static str;

    async fn login(&self, credentials: &Credentials) -> Result<Session, StorageError>;

    /// 列出账户内全部记录，不做过滤
    async fn list_files(&self, session: &Session) -> Result<Vec<RemoteNode>, StorageError>;

    /// 把远端文件内容写入已存在的 `dest`，返回写入的字节数
    async fn download(
        &self,
        session: &Session,
        remote_id: &str,
        dest: &Path,
    ) -> Result<u64, StorageError>;

    async fn logout(&self, _session: &Session) -> Result<(), StorageError> {
        Ok(())
    }
}
