//! 交互流程: 连接 → 列表 → (确认后) 下载 → 渲染 → 清理

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::Instrument;

use super::catalog::CatalogService;
use super::session::SessionManager;
use super::transfer::TransferService;
use crate::core::error::CatalogError;
use crate::core::models::{Catalog, Interaction, StatusMessage, ViewerConfig};
use crate::core::render::{RenderOutcome, RenderService};

/// 一次请求的结果: 目录 (若可用) 以及交互记录
#[derive(Debug)]
pub struct ViewerRun {
    pub interaction: Interaction,
    pub catalog: Option<Catalog>,
}

pub struct ViewerService {
    session: Arc<SessionManager>,
    config: ViewerConfig,
    // 同一时刻只允许一个临时文件存在
    interaction_lock: Mutex<()>,
}

impl ViewerService {
    pub fn new(session: Arc<SessionManager>, config: ViewerConfig) -> Self {
        Self {
            session,
            config,
            interaction_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// 只列出目录，不下载任何文件
    pub async fn browse(&self) -> ViewerRun {
        let mut interaction = Interaction::new(None);
        let catalog = self.load_catalog(&mut interaction).await;
        ViewerRun {
            interaction,
            catalog,
        }
    }

    /// 确认操作: 下载并渲染 `display_name`
    pub async fn view(&self, display_name: &str) -> ViewerRun {
        let interaction = Interaction::new(Some(display_name.to_string()));
        let span = tracing::info_span!("view", id = %interaction.id, file = display_name);
        self.run_view(interaction, display_name)
            .instrument(span)
            .await
    }

    async fn run_view(&self, mut interaction: Interaction, display_name: &str) -> ViewerRun {
        let _guard = self.interaction_lock.lock().await;

        let Some(catalog) = self.load_catalog(&mut interaction).await else {
            return ViewerRun {
                interaction,
                catalog: None,
            };
        };
        self.view_entry(&mut interaction, &catalog, display_name).await;
        ViewerRun {
            interaction,
            catalog: Some(catalog),
        }
    }

    async fn view_entry(
        &self,
        interaction: &mut Interaction,
        catalog: &Catalog,
        display_name: &str,
    ) {
        let Some(entry) = catalog.lookup(display_name) else {
            tracing::warn!("Requested file {:?} is not in the catalog", display_name);
            interaction.push(StatusMessage::warning(format!(
                "{display_name} is not among the viewable files in your account."
            )));
            return;
        };

        interaction.push(StatusMessage::info(format!(
            "Downloading {} from storage...",
            entry.name
        )));
        let artifact =
            match TransferService::fetch(&self.session, entry, &self.config.temp_dir()).await {
                Ok(artifact) => artifact,
                Err(e) => {
                    tracing::error!("Download of {} failed: {}", entry.name, e);
                    interaction.push(StatusMessage::error(format!(
                        "Could not download {}: {e}",
                        entry.name
                    )));
                    return;
                }
            };

        match RenderService::render(artifact.path(), artifact.extension(), &self.config.render)
            .await
        {
            Ok(RenderOutcome::Rendered(output)) => {
                interaction.push(StatusMessage::success(format!("Loaded {}", entry.name)));
                interaction.output = Some(output);
            }
            Ok(RenderOutcome::Unsupported(ext)) => {
                tracing::warn!("No renderer for extension {}", ext);
                interaction.push(StatusMessage::warning("Unsupported format."));
            }
            Err(e) => {
                tracing::error!("Rendering {} failed: {}", entry.name, e);
                interaction.push(StatusMessage::error(format!("Could not visualize file: {e}")));
            }
        }

        if let Err(e) = artifact.close() {
            tracing::warn!("Failed to remove temporary file: {}", e);
        }
    }

    /// 连接并列出目录; 失败或为空时终止本次交互
    async fn load_catalog(&self, interaction: &mut Interaction) -> Option<Catalog> {
        match CatalogService::list(&self.session).await {
            Ok(catalog) if catalog.is_empty() => {
                interaction.halt(StatusMessage::warning(
                    "No supported CAD files found in your account.",
                ));
                None
            }
            Ok(catalog) => Some(catalog),
            Err(CatalogError::Auth(e)) => {
                interaction.halt(StatusMessage::error(format!(
                    "Could not connect to storage: {e}"
                )));
                None
            }
            Err(CatalogError::Listing(e)) => {
                tracing::error!("Listing files failed: {}", e);
                interaction.halt(StatusMessage::error(format!(
                    "Error fetching files: {e}"
                )));
                None
            }
        }
    }
}
