//! 输入模块
//!
//! 提供按键名称规范化、键盘注入和输入调度功能
//!
//! # 子模块
//!
//! - [`error`] - 错误类型定义
//! - [`keymap`] - 按键名称规范化（静态别名表）
//! - [`keyboard`] - 基于 enigo 的键盘注入
//! - [`dispatcher`] - 单键/组合键/按下/释放/文本调度
//! - [`worker`] - 独占键盘句柄的工作线程
//!
//! # 使用示例
//!
//! ```ignore
//! use keyfree_lib::input::{InputCommand, InputWorker, KeyboardSimulator};
//!
//! let worker = InputWorker::spawn(KeyboardSimulator::new)?;
//! worker.execute(InputCommand::Chord(vec!["ctrl".into(), "c".into()])).await?;
//! ```

pub mod dispatcher;
pub mod error;
pub mod keyboard;
pub mod keymap;
pub mod worker;

// Re-export commonly used types
pub use dispatcher::{InputDispatcher, CHORD_HOLD, MAX_CHORD_KEYS, SINGLE_HOLD};
pub use error::{InputError, InputResult};
pub use keyboard::{KeyInjector, KeyboardSimulator};
pub use keymap::{available_keys, normalize, CanonicalKey, NamedKey};
pub use worker::{InputCommand, InputWorker};
