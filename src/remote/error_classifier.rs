// 错误分类模块 - 将底层网络错误转换为用户友好的消息
use reqwest::Error;

use crate::core::error::StorageError;

/// 分类请求错误并返回错误类型与英文提示
///
/// 返回值: (错误类型, 英文提示)
/// - 错误类型: 用于日志
/// - 英文提示: 显示在页面上
pub fn classify_request_error(error: &Error) -> (&'static str, &'static str) {
    if error.is_timeout() {
        (
            "timeout_error",
            "Request to the storage service timed out, please check your network connection",
        )
    } else if error.is_connect() {
        (
            "connection_error",
            "Could not reach the storage service, please check the remote URL or your network",
        )
    } else if error.is_decode() {
        (
            "decode_error",
            "The storage service sent a response that could not be decoded",
        )
    } else if error.is_body() {
        (
            "stream_error",
            "The transfer was interrupted, please retry",
        )
    } else {
        ("unknown_error", "Unknown error while talking to the storage service")
    }
}

/// reqwest 错误 → StorageError::Network，保留原始错误文本
pub fn network_error(error: Error) -> StorageError {
    let (kind, hint) = classify_request_error(&error);
    tracing::debug!("Storage request failed ({}): {}", kind, error);
    StorageError::Network {
        kind,
        message: format!("{hint} ({error})"),
    }
}
