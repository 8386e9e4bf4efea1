//! 输入模块错误类型
//!
//! 定义按键解析与键盘注入相关的错误类型

use thiserror::Error;

/// 输入操作错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// 存在无法识别的按键名称（整个操作未产生任何按键）
    #[error("Invalid key(s): {}", .0.join(", "))]
    InvalidKeys(Vec<String>),

    /// 组合键数量不在 1..=4 范围内
    #[error("Chord must contain between 1 and 4 keys, got {0}")]
    InvalidChord(usize),

    /// 输入文本为空
    #[error("Text parameter must be a non-empty string")]
    EmptyText,

    /// 键盘模拟失败
    #[error("Keyboard simulation failed: {0}")]
    KeyboardSimulationFailed(String),

    /// 当前平台不支持该按键
    #[error("Key not supported on this platform: {0}")]
    UnsupportedKey(String),

    /// 输入工作线程不可用
    #[error("Input worker is not running")]
    WorkerUnavailable,
}

/// 输入操作结果类型
pub type InputResult<T> = Result<T, InputError>;
