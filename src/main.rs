use anyhow::Context;
use clap::Parser;
use cloud_cad_viewer::core::models::ViewerConfig;
use cloud_cad_viewer::core::storage::SecretsStorage;
use cloud_cad_viewer::core::traits::StorageBackend;
use cloud_cad_viewer::remote::{HttpStorageClient, LocalDirStorage};
use cloud_cad_viewer::state::AppState;
use cloud_cad_viewer::web::WebServer;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "PORT", default_value_t = 8501)]
    port: u16,

    #[arg(long, env = "BIND_ADDRESS", default_value = "127.0.0.1")]
    bind: String,

    /// secrets.toml with storage_email / storage_password
    #[arg(long, env = "SECRETS_FILE")]
    secrets: Option<PathBuf>,

    /// Base URL of the storage service
    #[arg(long, env = "REMOTE_URL", conflicts_with = "storage_dir")]
    remote_url: Option<String>,

    /// Serve a local directory as the storage account instead
    #[arg(long, env = "STORAGE_DIR")]
    storage_dir: Option<PathBuf>,

    /// Directory for downloaded temporary files (default: system temp dir)
    #[arg(long, env = "TEMP_DIR")]
    temp_dir: Option<PathBuf>,

    /// Storage request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT", default_value_t = 120)]
    request_timeout: u64,

    /// Also write daily-rotated logs into this directory
    #[arg(long, env = "LOG_DIR")]
    log_dir: Option<PathBuf>,
}

fn init_tracing(log_dir: Option<&PathBuf>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
    );

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "cloud-cad-viewer.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    guard
}

fn build_backend(args: &Args) -> anyhow::Result<Arc<dyn StorageBackend>> {
    if let Some(dir) = &args.storage_dir {
        tracing::info!("Using local directory {:?} as storage", dir);
        return Ok(Arc::new(LocalDirStorage::new(dir.clone())));
    }

    let url = args
        .remote_url
        .as_deref()
        .context("either --remote-url or --storage-dir must be given")?;
    let client = HttpStorageClient::new(url, Duration::from_secs(args.request_timeout))
        .with_context(|| format!("invalid remote url {url}"))?;
    tracing::info!("Using storage service at {}", url);
    Ok(Arc::new(client))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _log_guard = init_tracing(args.log_dir.as_ref());

    // 凭据缺失或密钥文件无效都不阻止启动，交互时显示认证错误
    let credentials = SecretsStorage::resolve(args.secrets.as_deref());
    let backend = build_backend(&args)?;

    let config = ViewerConfig {
        temp_dir: args.temp_dir.clone(),
        ..ViewerConfig::default()
    };

    let state = Arc::new(AppState::new(backend, credentials, config));
    WebServer::new(&args.bind, args.port, state)
        .map_err(anyhow::Error::msg)?
        .run()
        .await
        .map_err(anyhow::Error::msg)
}
