use crate::core::models::{CredentialSource, ViewerConfig};
use crate::core::services::{SessionManager, ViewerService};
use crate::core::traits::StorageBackend;
use std::sync::Arc;

/// Web 应用状态
pub struct AppState {
    pub session: Arc<SessionManager>,
    pub viewer: ViewerService,
}

impl AppState {
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        credentials: impl Into<CredentialSource>,
        config: ViewerConfig,
    ) -> Self {
        let session = Arc::new(SessionManager::new(backend, credentials));
        let viewer = ViewerService::new(session.clone(), config);
        Self { session, viewer }
    }

    pub fn config(&self) -> &ViewerConfig {
        self.viewer.config()
    }
}
