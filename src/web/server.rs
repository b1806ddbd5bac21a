//! Web 服务器

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::routes;
use crate::api::{self, common};
use crate::state::AppState;

/// 构建完整路由: 页面 + API + 中间件
pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::build_routes(state.clone()))
        .merge(api::build_routes(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(axum::middleware::from_fn(common::request_logger))
        .layer(TraceLayer::new_for_http())
}

/// Web 服务器
pub struct WebServer {
    addr: SocketAddr,
    state: Arc<AppState>,
}

impl WebServer {
    pub fn new(bind_addr: &str, port: u16, state: Arc<AppState>) -> Result<Self, String> {
        let addr: SocketAddr = format!("{}:{}", bind_addr, port)
            .parse()
            .map_err(|e| format!("invalid bind address {}:{}: {}", bind_addr, port, e))?;
        Ok(Self { addr, state })
    }

    /// 启动服务器，收到 Ctrl-C 后退出并释放存储会话
    pub async fn run(self) -> Result<(), String> {
        let app = build_app(self.state.clone());

        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|e| format!("failed to bind {}: {}", self.addr, e))?;

        tracing::info!("Viewer listening on http://{}", self.addr);
        tracing::info!(
            "Storage backend: {}, temp dir: {:?}",
            self.state.session.backend_name(),
            self.state.config().temp_dir()
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| format!("server error: {}", e))?;

        tracing::info!("Shutting down, closing storage session");
        self.state.session.dispose().await;
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
