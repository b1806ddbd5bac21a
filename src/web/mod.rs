//! Web 服务器模块
//! 提供页面与 HTTP API

pub mod handlers;
pub mod pages;
pub mod routes;
pub mod server;

pub use server::{build_app, WebServer};
