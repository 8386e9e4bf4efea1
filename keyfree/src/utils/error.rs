//! 全局错误处理模块
//!
//! 提供统一的应用错误类型，HTTP 层据此决定状态码和 `{error}` 消息
//!
//! # 功能
//!
//! - 统一的 `AppError` 类型，聚合所有模块错误
//! - 错误代码用于客户端识别
//! - 状态码映射：400 请求无效、404 按键或应用不存在、500 注入/内部失败、503 音量控制不可用
//!
//! # 使用示例
//!
//! ```
//! use keyfree_lib::utils::error::{AppError, AppResult};
//!
//! fn require(value: Option<&str>) -> AppResult<&str> {
//!     value.ok_or_else(|| AppError::Validation("Key parameter is required".to_string()))
//! }
//!
//! assert_eq!(require(None).unwrap_err().status_code(), 400);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::InputError;
use crate::state::config::ConfigError;
use crate::volume::VolumeError;

/// 应用错误类型
///
/// 聚合所有模块的错误类型，提供统一的错误处理接口
#[derive(Error, Debug)]
pub enum AppError {
    /// 输入错误
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// 音量错误
    #[error("Volume error: {0}")]
    Volume(#[from] VolumeError),

    /// 配置错误
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// 请求参数无效
    #[error("Validation error: {0}")]
    Validation(String),

    /// 路由不存在
    #[error("Endpoint not found")]
    EndpointNotFound,

    /// 内部错误
    #[error("Internal error: {0}")]
    Internal(String),
}

/// 错误代码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // 请求错误
    /// 参数缺失或无效
    InvalidRequest,
    /// 路由不存在
    EndpointNotFound,

    // 输入错误
    /// 未知按键名
    InvalidKey,
    /// 当前平台无法模拟该按键
    UnsupportedKey,
    /// 键盘模拟失败
    InputInjectionFailed,

    // 音量错误
    /// 没有匹配的音频会话
    AppNotFound,
    /// 音量控制不可用
    VolumeUnavailable,
    /// 音频后端调用失败
    VolumeBackendError,

    // 配置错误
    /// 配置加载失败
    ConfigLoadFailed,
    /// 配置无效
    ConfigInvalid,

    // 通用错误
    /// 内部错误
    InternalError,
}

impl AppError {
    /// 获取错误代码
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Input(InputError::InvalidKeys(_)) => ErrorCode::InvalidKey,
            AppError::Input(InputError::InvalidChord(_)) => ErrorCode::InvalidRequest,
            AppError::Input(InputError::EmptyText) => ErrorCode::InvalidRequest,
            AppError::Input(InputError::UnsupportedKey(_)) => ErrorCode::UnsupportedKey,
            AppError::Input(_) => ErrorCode::InputInjectionFailed,

            AppError::Volume(VolumeError::AppNotFound(_)) => ErrorCode::AppNotFound,
            AppError::Volume(VolumeError::Unavailable) => ErrorCode::VolumeUnavailable,
            AppError::Volume(VolumeError::MasterUnavailable) => ErrorCode::VolumeUnavailable,
            AppError::Volume(VolumeError::Backend(_)) => ErrorCode::VolumeBackendError,

            AppError::Config(ConfigError::Json(_)) => ErrorCode::ConfigInvalid,
            AppError::Config(_) => ErrorCode::ConfigLoadFailed,

            AppError::Validation(_) => ErrorCode::InvalidRequest,
            AppError::EndpointNotFound => ErrorCode::EndpointNotFound,
            AppError::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self.code() {
            ErrorCode::InvalidRequest => 400,
            ErrorCode::InvalidKey | ErrorCode::AppNotFound | ErrorCode::EndpointNotFound => 404,
            ErrorCode::VolumeUnavailable => 503,
            ErrorCode::UnsupportedKey
            | ErrorCode::InputInjectionFailed
            | ErrorCode::VolumeBackendError
            | ErrorCode::ConfigLoadFailed
            | ErrorCode::ConfigInvalid
            | ErrorCode::InternalError => 500,
        }
    }

    /// 返回给客户端的错误消息（`{error}` 字段）
    pub fn user_message(&self) -> String {
        match self {
            AppError::Input(e) => e.to_string(),
            AppError::Volume(e) => e.to_string(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Config(e) => e.to_string(),
            AppError::EndpointNotFound => "Endpoint not found".to_string(),
            AppError::Internal(msg) => msg.clone(),
        }
    }
}

/// 应用结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        let err = AppError::Input(InputError::InvalidKeys(vec!["nope".to_string()]));
        assert_eq!(err.code(), ErrorCode::InvalidKey);

        let err = AppError::Volume(VolumeError::AppNotFound("ghost".to_string()));
        assert_eq!(err.code(), ErrorCode::AppNotFound);

        let err = AppError::Volume(VolumeError::Unavailable);
        assert_eq!(err.code(), ErrorCode::VolumeUnavailable);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::Validation("x".to_string()).status_code(), 400);
        assert_eq!(AppError::Input(InputError::EmptyText).status_code(), 400);
        assert_eq!(AppError::Input(InputError::InvalidChord(5)).status_code(), 400);
        assert_eq!(
            AppError::Input(InputError::InvalidKeys(vec!["x".to_string()])).status_code(),
            404
        );
        assert_eq!(
            AppError::Volume(VolumeError::AppNotFound("x".to_string())).status_code(),
            404
        );
        assert_eq!(AppError::EndpointNotFound.status_code(), 404);
        assert_eq!(
            AppError::Input(InputError::KeyboardSimulationFailed("x".to_string())).status_code(),
            500
        );
        assert_eq!(AppError::Volume(VolumeError::Unavailable).status_code(), 503);
        assert_eq!(AppError::Volume(VolumeError::MasterUnavailable).status_code(), 503);
    }

    #[test]
    fn test_user_message() {
        let err = AppError::Input(InputError::InvalidKeys(vec!["foo".to_string(), "bar".to_string()]));
        assert_eq!(err.user_message(), "Invalid key(s): foo, bar");

        let err = AppError::Volume(VolumeError::AppNotFound("chrome".to_string()));
        assert_eq!(err.user_message(), "App not found: chrome");

        let err = AppError::Volume(VolumeError::Unavailable);
        assert_eq!(err.user_message(), "Volume control not available");

        let err = AppError::Validation("Key parameter is required".to_string());
        assert_eq!(err.user_message(), "Key parameter is required");
    }

    #[test]
    fn test_error_code_serialization() {
        let code = ErrorCode::VolumeUnavailable;
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"VOLUME_UNAVAILABLE\"");

        let deserialized: ErrorCode = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, code);
    }
}
