//! 核心模块
//! 包含不依赖 Web 运行时的业务逻辑

pub mod error;
pub mod mesh;
pub mod models;
pub mod render;
pub mod services;
pub mod storage;
pub mod traits;

// 重导出常用类型
pub use traits::StorageBackend;
