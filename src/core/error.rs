//! 各阶段错误类型

use std::path::PathBuf;
use thiserror::Error;

/// 存储后端错误
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// 会话失效 (token 过期等)，可重新登录后重试
    #[error("session is no longer authorized")]
    Unauthorized,

    #[error("remote file not found: {0}")]
    NotFound(String),

    #[error("{kind}: {message}")]
    Network { kind: &'static str, message: String },

    #[error("storage service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("storage credentials are not configured (set storage_email and storage_password)")]
    MissingCredentials,

    #[error("invalid secrets configuration: {0}")]
    InvalidSecrets(String),

    #[error("login rejected: {0}")]
    Rejected(String),

    #[error("{0}")]
    Backend(StorageError),
}

impl From<StorageError> for AuthError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::InvalidCredentials(msg) => Self::Rejected(msg),
            other => Self::Backend(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("{0}")]
    Listing(StorageError),
}

#[derive(Debug, Error)]
pub enum TransferError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("could not create temporary file: {0}")]
    TempFile(std::io::Error),

    #[error("{0}")]
    Download(StorageError),
}

/// 网格解析错误
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("{0} tessellation is not supported by this viewer")]
    UnsupportedFormat(&'static str),

    #[error("invalid file content: {0}")]
    InvalidContent(String),

    #[error("invalid face count: expected {expected}, got {got}")]
    InvalidFaceCount { expected: u32, got: u32 },

    #[error("face references vertex {index} but the mesh has {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("mesh contains no triangles")]
    Empty,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("float parsing error: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),

    #[error("integer parsing error: {0}")]
    ParseInt(#[from] std::num::ParseIntError),
}

impl MeshError {
    pub fn invalid_content(message: impl Into<String>) -> Self {
        Self::InvalidContent(message.into())
    }

    /// 打开文件时区分 "不存在" 与其它 I/O 错误
    pub(crate) fn open(path: &std::path::Path, e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io(e)
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error("render task failed: {0}")]
    Task(String),

    #[error("could not encode figure: {0}")]
    Figure(#[from] serde_json::Error),
}

/// 启动阶段的密钥加载错误
#[derive(Debug, Error)]
pub enum SecretsError {
    #[error("failed to read secrets file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse secrets file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
