//! 输入调度模块
//!
//! 将具名操作（单键、组合键、按下/释放、文本输入）映射为按键事件序列
//!
//! # 规则
//!
//! - 所有按键名称在产生任何按键事件之前全部解析；任一失败则整个操作失败且不按下任何键
//! - 组合键按声明顺序按下，按完全相反的顺序释放
//! - 按住时长为固定常量：单键 50ms，组合键 100ms
//! - 注入失败时直接返回错误，已按下的按键不会自动释放
//!
//! # 使用示例
//!
//! ```ignore
//! use keyfree_lib::input::{InputDispatcher, KeyboardSimulator};
//!
//! let mut dispatcher = InputDispatcher::new(KeyboardSimulator::new()?);
//! dispatcher.chord(&["ctrl", "c"])?;
//! ```

use std::thread;
use std::time::Duration;

use super::error::{InputError, InputResult};
use super::keyboard::KeyInjector;
use super::keymap::{self, CanonicalKey};

/// 单键按住时长
pub const SINGLE_HOLD: Duration = Duration::from_millis(50);

/// 组合键按住时长
pub const CHORD_HOLD: Duration = Duration::from_millis(100);

/// 组合键最大按键数
pub const MAX_CHORD_KEYS: usize = 4;

/// 输入调度器
///
/// 持有一个 [`KeyInjector`] 后端，不保存跨请求状态
pub struct InputDispatcher<I: KeyInjector> {
    injector: I,
}

impl<I: KeyInjector> InputDispatcher<I> {
    /// 创建新的调度器
    pub fn new(injector: I) -> Self {
        Self { injector }
    }

    /// 单键：按下、保持 50ms、释放
    pub fn single(&mut self, key: &str) -> InputResult<()> {
        let key = resolve_one(key)?;

        self.injector.press(key)?;
        thread::sleep(SINGLE_HOLD);
        self.injector.release(key)
    }

    /// 组合键：按顺序按下全部按键，保持 100ms，逆序释放
    ///
    /// duo/trio/quartet 均通过此方法实现
    ///
    /// # Errors
    ///
    /// - `InputError::InvalidChord` - 按键数量不在 1..=4
    /// - `InputError::InvalidKeys` - 存在无法识别的按键（不会按下任何键）
    /// - `InputError::KeyboardSimulationFailed` - 注入失败（已按下的键保持按下）
    pub fn chord<S: AsRef<str>>(&mut self, tokens: &[S]) -> InputResult<()> {
        if tokens.is_empty() || tokens.len() > MAX_CHORD_KEYS {
            return Err(InputError::InvalidChord(tokens.len()));
        }

        let keys = keymap::normalize_all(tokens).map_err(InputError::InvalidKeys)?;

        for key in &keys {
            self.injector.press(*key)?;
        }

        thread::sleep(CHORD_HOLD);

        for key in keys.iter().rev() {
            self.injector.release(*key)?;
        }

        Ok(())
    }

    /// 仅按下，由调用方负责释放
    pub fn down(&mut self, key: &str) -> InputResult<()> {
        let key = resolve_one(key)?;
        self.injector.press(key)
    }

    /// 仅释放
    pub fn up(&mut self, key: &str) -> InputResult<()> {
        let key = resolve_one(key)?;
        self.injector.release(key)
    }

    /// 逐字符输入文本
    pub fn type_string(&mut self, text: &str) -> InputResult<()> {
        if text.is_empty() {
            return Err(InputError::EmptyText);
        }

        self.injector.type_text(text)
    }
}

fn resolve_one(token: &str) -> InputResult<CanonicalKey> {
    keymap::normalize(token).ok_or_else(|| InputError::InvalidKeys(vec![token.to_string()]))
}
