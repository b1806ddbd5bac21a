//! 账户凭据与会话

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// 存储账户凭据，进程生命周期内只读
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

// 密码不能出现在日志里
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// 启动时的凭据加载结果; 无效配置也要延迟到交互时显示
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    Loaded(Credentials),
    Missing,
    /// 密钥文件无法读取或解析
    Invalid(String),
}

impl From<Option<Credentials>> for CredentialSource {
    fn from(credentials: Option<Credentials>) -> Self {
        credentials.map_or(Self::Missing, Self::Loaded)
    }
}

/// 登录成功后得到的会话句柄
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub email: String,
    pub established_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            email: email.into(),
            established_at: Utc::now(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("email", &self.email)
            .field("established_at", &self.established_at)
            .finish_non_exhaustive()
    }
}

/// 会话状态 (对外展示，不含 token)
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub backend: String,
    pub connected: bool,
    pub email: Option<String>,
    pub established_at: Option<DateTime<Utc>>,
}
