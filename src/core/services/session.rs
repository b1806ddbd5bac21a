//! 会话管理
//! 登录成功后缓存会话; 会话失效时重新登录一次; 退出时显式释放

use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::core::error::{AuthError, StorageError};
use crate::core::models::{CredentialSource, RemoteNode, Session, SessionStatus};
use crate::core::traits::StorageBackend;

pub struct SessionManager {
    backend: Arc<dyn StorageBackend>,
    credentials: CredentialSource,
    session: RwLock<Option<Session>>,
}

impl SessionManager {
    pub fn new(backend: Arc<dyn StorageBackend>, credentials: impl Into<CredentialSource>) -> Self {
        Self {
            backend,
            credentials: credentials.into(),
            session: RwLock::new(None),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// 返回缓存的会话，没有则登录; 登录失败不缓存
    pub async fn connect(&self) -> Result<Session, AuthError> {
        if let Some(session) = self.session.read().await.as_ref() {
            return Ok(session.clone());
        }

        let mut guard = self.session.write().await;
        // 等待写锁期间可能已有其它请求登录成功
        if let Some(session) = guard.as_ref() {
            return Ok(session.clone());
        }

        let credentials = match &self.credentials {
            CredentialSource::Loaded(credentials) => credentials,
            CredentialSource::Missing => return Err(AuthError::MissingCredentials),
            CredentialSource::Invalid(message) => {
                return Err(AuthError::InvalidSecrets(message.clone()))
            }
        };

        tracing::info!(
            "Logging in to {} storage as {}",
            self.backend.name(),
            credentials.email
        );
        match self.backend.login(credentials).await {
            Ok(session) => {
                tracing::info!("Storage session established for {}", session.email);
                *guard = Some(session.clone());
                Ok(session)
            }
            Err(e) => {
                tracing::warn!("Storage login failed: {}", e);
                Err(e.into())
            }
        }
    }

    /// 丢弃缓存的会话 (不通知后端)
    pub async fn invalidate(&self) {
        if self.session.write().await.take().is_some() {
            tracing::info!("Storage session invalidated");
        }
    }

    /// 退出登录并清空缓存
    pub async fn dispose(&self) {
        let Some(session) = self.session.write().await.take() else {
            return;
        };
        match self.backend.logout(&session).await {
            Ok(()) => tracing::info!("Storage session for {} closed", session.email),
            Err(e) => tracing::warn!("Storage logout failed: {}", e),
        }
    }

    pub async fn status(&self) -> SessionStatus {
        let guard = self.session.read().await;
        SessionStatus {
            backend: self.backend.name().to_string(),
            connected: guard.is_some(),
            email: guard.as_ref().map(|s| s.email.clone()),
            established_at: guard.as_ref().map(|s| s.established_at),
        }
    }

    /// 列出远端记录; 会话过期时重新登录后重试一次
    pub async fn list_files(&self) -> Result<Vec<RemoteNode>, SessionCallError> {
        let session = self.connect().await?;
        match self.backend.list_files(&session).await {
            Err(StorageError::Unauthorized) => {
                tracing::warn!("Session rejected while listing files, logging in again");
                self.invalidate().await;
                let session = self.connect().await?;
                Ok(self.backend.list_files(&session).await?)
            }
            other => Ok(other?),
        }
    }

    /// 下载到 `dest`; 会话过期时重新登录后重试一次
    pub async fn download(&self, remote_id: &str, dest: &Path) -> Result<u64, SessionCallError> {
        let session = self.connect().await?;
        match self.backend.download(&session, remote_id, dest).await {
            Err(StorageError::Unauthorized) => {
                tracing::warn!("Session rejected while downloading, logging in again");
                self.invalidate().await;
                let session = self.connect().await?;
                Ok(self.backend.download(&session, remote_id, dest).await?)
            }
            other => Ok(other?),
        }
    }
}

/// 经由会话调用后端时的错误: 登录失败或后端失败
#[derive(Debug, thiserror::Error)]
pub enum SessionCallError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
