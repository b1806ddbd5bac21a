// remote 模块 - 存储后端实现

pub mod client;
pub mod error_classifier;
pub mod local;

pub use client::HttpStorageClient;
pub use local::LocalDirStorage;
