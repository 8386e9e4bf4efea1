//! 键盘模拟模块
//!
//! 封装 enigo，将 [`CanonicalKey`] 转换为平台按键并执行按下/释放/文本输入
//!
//! # 功能
//!
//! - [`KeyInjector`]：按键注入后端抽象，调度器只依赖此 trait
//! - [`KeyboardSimulator`]：基于 enigo 的真实实现
//!
//! # 平台支持
//!
//! | 平台 | 通用键 | 左右修饰键 | F13-F24 | 小键盘 |
//! |------|--------|------------|---------|--------|
//! | Windows | ✅ | ✅ | ✅ | ✅ |
//! | macOS | ✅ | ✅ | F13-F20 | ✅ |
//! | Linux (X11) | ✅ | ✅ | ✅ | ✅ |
//!
//! 无法映射的按键返回 [`InputError::UnsupportedKey`]

use super::error::{InputError, InputResult};
use super::keymap::{CanonicalKey, NamedKey};
use enigo::{Direction, Enigo, Key, Keyboard, Settings};

/// 按键注入后端
///
/// 调度器通过此 trait 执行底层按键事件，便于替换为测试实现
pub trait KeyInjector {
    /// 按下按键（不释放）
    fn press(&mut self, key: CanonicalKey) -> InputResult<()>;

    /// 释放按键
    fn release(&mut self, key: CanonicalKey) -> InputResult<()>;

    /// 以文本方式输入字符串
    fn type_text(&mut self, text: &str) -> InputResult<()>;
}

/// 键盘模拟器
///
/// 封装 enigo 库，提供跨平台的键盘模拟功能
pub struct KeyboardSimulator {
    /// enigo 实例
    enigo: Enigo,
}

impl KeyboardSimulator {
    /// 创建新的键盘模拟器
    ///
    /// # Errors
    ///
    /// - `InputError::KeyboardSimulationFailed` - 初始化失败（例如无显示服务器）
    pub fn new() -> InputResult<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| InputError::KeyboardSimulationFailed(format!("Failed to initialize: {}", e)))?;

        tracing::debug!("Keyboard simulator initialized");

        Ok(Self { enigo })
    }

    fn send(&mut self, key: CanonicalKey, direction: Direction) -> InputResult<()> {
        let platform_key = to_enigo_key(key)?;

        tracing::trace!(%key, ?direction, "Sending key event");

        self.enigo.key(platform_key, direction).map_err(|e| {
            InputError::KeyboardSimulationFailed(format!("Failed to send {:?} for {}: {}", direction, key, e))
        })
    }
}

impl KeyInjector for KeyboardSimulator {
    fn press(&mut self, key: CanonicalKey) -> InputResult<()> {
        self.send(key, Direction::Press)
    }

    fn release(&mut self, key: CanonicalKey) -> InputResult<()> {
        self.send(key, Direction::Release)
    }

    fn type_text(&mut self, text: &str) -> InputResult<()> {
        if text.is_empty() {
            return Ok(());
        }

        tracing::debug!(text_len = text.len(), "Typing text");

        self.enigo
            .text(text)
            .map_err(|e| InputError::KeyboardSimulationFailed(format!("Failed to type text: {}", e)))
    }
}

/// 将规范按键转换为 enigo 按键
///
/// # Errors
///
/// - `InputError::UnsupportedKey` - 当前平台没有对应的按键
pub fn to_enigo_key(key: CanonicalKey) -> InputResult<Key> {
    match key {
        CanonicalKey::Character(c) => Ok(Key::Unicode(c)),
        CanonicalKey::Named(named) => named_key(named),
        CanonicalKey::VirtualKey(vk) => raw::virtual_key(vk)
            .map(Key::Other)
            .ok_or_else(|| InputError::UnsupportedKey(key.to_string())),
    }
}

fn named_key(named: NamedKey) -> InputResult<Key> {
    let key = match named {
        NamedKey::Ctrl => Key::Control,
        NamedKey::Shift => Key::Shift,
        NamedKey::Alt => Key::Alt,
        NamedKey::Meta => Key::Meta,
        NamedKey::Enter => Key::Return,
        NamedKey::Space => Key::Space,
        NamedKey::Tab => Key::Tab,
        NamedKey::Escape => Key::Escape,
        NamedKey::Backspace => Key::Backspace,
        NamedKey::Delete => Key::Delete,
        NamedKey::Home => Key::Home,
        NamedKey::End => Key::End,
        NamedKey::PageUp => Key::PageUp,
        NamedKey::PageDown => Key::PageDown,
        NamedKey::Up => Key::UpArrow,
        NamedKey::Down => Key::DownArrow,
        NamedKey::Left => Key::LeftArrow,
        NamedKey::Right => Key::RightArrow,
        NamedKey::Function(1) => Key::F1,
        NamedKey::Function(2) => Key::F2,
        NamedKey::Function(3) => Key::F3,
        NamedKey::Function(4) => Key::F4,
        NamedKey::Function(5) => Key::F5,
        NamedKey::Function(6) => Key::F6,
        NamedKey::Function(7) => Key::F7,
        NamedKey::Function(8) => Key::F8,
        NamedKey::Function(9) => Key::F9,
        NamedKey::Function(10) => Key::F10,
        NamedKey::Function(11) => Key::F11,
        NamedKey::Function(12) => Key::F12,
        // 左右修饰键、Insert 和 F13-F24 使用平台原始键码
        other => {
            return raw::named(other)
                .map(Key::Other)
                .ok_or_else(|| InputError::UnsupportedKey(CanonicalKey::Named(other).to_string()));
        }
    };

    Ok(key)
}

/// Windows: 虚拟键码
#[cfg(target_os = "windows")]
mod raw {
    use super::NamedKey;

    pub fn named(key: NamedKey) -> Option<u32> {
        match key {
            NamedKey::LeftShift => Some(0xA0),
            NamedKey::RightShift => Some(0xA1),
            NamedKey::LeftCtrl => Some(0xA2),
            NamedKey::RightCtrl => Some(0xA3),
            NamedKey::LeftAlt => Some(0xA4),
            NamedKey::RightAlt => Some(0xA5),
            NamedKey::LeftMeta => Some(0x5B),
            NamedKey::RightMeta => Some(0x5C),
            NamedKey::Insert => Some(0x2D),
            NamedKey::Function(n @ 13..=24) => Some(0x7C + u32::from(n - 13)),
            _ => None,
        }
    }

    pub fn virtual_key(vk: u16) -> Option<u32> {
        Some(u32::from(vk))
    }
}

/// macOS: 虚拟键码（kVK_*）
#[cfg(target_os = "macos")]
mod raw {
    use super::NamedKey;

    pub fn named(key: NamedKey) -> Option<u32> {
        match key {
            NamedKey::LeftShift => Some(0x38),
            NamedKey::RightShift => Some(0x3C),
            NamedKey::LeftCtrl => Some(0x3B),
            NamedKey::RightCtrl => Some(0x3E),
            NamedKey::LeftAlt => Some(0x3A),
            NamedKey::RightAlt => Some(0x3D),
            NamedKey::LeftMeta => Some(0x37),
            NamedKey::RightMeta => Some(0x36),
            // Help 键位于 Insert 的位置
            NamedKey::Insert => Some(0x72),
            NamedKey::Function(13) => Some(0x69),
            NamedKey::Function(14) => Some(0x6B),
            NamedKey::Function(15) => Some(0x71),
            NamedKey::Function(16) => Some(0x6A),
            NamedKey::Function(17) => Some(0x40),
            NamedKey::Function(18) => Some(0x4F),
            NamedKey::Function(19) => Some(0x50),
            NamedKey::Function(20) => Some(0x5A),
            _ => None,
        }
    }

    pub fn virtual_key(vk: u16) -> Option<u32> {
        const KEYPAD_DIGITS: [u32; 10] = [0x52, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5B, 0x5C];

        match vk {
            0x60..=0x69 => Some(KEYPAD_DIGITS[usize::from(vk - 0x60)]),
            0x6A => Some(0x43),
            0x6B => Some(0x45),
            0x6D => Some(0x4E),
            0x6E => Some(0x41),
            0x6F => Some(0x4B),
            _ => None,
        }
    }
}

/// Linux/BSD: X11 keysym
#[cfg(all(unix, not(target_os = "macos")))]
mod raw {
    use super::NamedKey;

    const XK_F1: u32 = 0xffbe;
    const XK_KP_0: u32 = 0xffb0;

    pub fn named(key: NamedKey) -> Option<u32> {
        match key {
            NamedKey::LeftShift => Some(0xffe1),
            NamedKey::RightShift => Some(0xffe2),
            NamedKey::LeftCtrl => Some(0xffe3),
            NamedKey::RightCtrl => Some(0xffe4),
            NamedKey::LeftAlt => Some(0xffe9),
            NamedKey::RightAlt => Some(0xffea),
            NamedKey::LeftMeta => Some(0xffeb),
            NamedKey::RightMeta => Some(0xffec),
            NamedKey::Insert => Some(0xff63),
            NamedKey::Function(n @ 13..=24) => Some(XK_F1 + u32::from(n - 1)),
            _ => None,
        }
    }

    pub fn virtual_key(vk: u16) -> Option<u32> {
        match vk {
            0x60..=0x69 => Some(XK_KP_0 + u32::from(vk - 0x60)),
            0x6A => Some(0xffaa),
            0x6B => Some(0xffab),
            0x6D => Some(0xffad),
            0x6E => Some(0xffae),
            0x6F => Some(0xffaf),
            _ => None,
        }
    }
}

#[cfg(not(any(target_os = "windows", unix)))]
mod raw {
    use super::NamedKey;

    pub fn named(_key: NamedKey) -> Option<u32> {
        None
    }

    pub fn virtual_key(_vk: u16) -> Option<u32> {
        None
    }
}
