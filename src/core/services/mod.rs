//! 核心服务层
//! 业务逻辑实现，不依赖 Web 运行时

pub mod catalog;
pub mod session;
pub mod transfer;
pub mod viewer;

pub use catalog::CatalogService;
pub use session::{SessionCallError, SessionManager};
pub use transfer::{TempArtifact, TransferService};
pub use viewer::{ViewerRun, ViewerService};

#[cfg(test)]
pub(crate) mod testing;
