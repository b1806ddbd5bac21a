//! 核心数据模型

mod config;
mod credentials;
mod file;
mod interaction;
mod mesh;

pub use config::{RenderConfig, ViewerConfig, MODEL_VIEWER_SCRIPT_URL, PLOTLY_SCRIPT_URL};
pub use credentials::{CredentialSource, Credentials, Session, SessionStatus};
pub use file::{
    Catalog, CatalogEntry, RemoteNode, RenderPath, SupportedFormat, SUPPORTED_EXTENSIONS,
};
pub use interaction::{Interaction, RenderOutput, StatusLevel, StatusMessage};
pub use mesh::Mesh;
