//! 按键名称规范化模块
//!
//! 将用户提供的按键名称（不区分大小写）映射为可注入的规范按键
//!
//! # 功能
//!
//! - 静态别名表：字母、数字、修饰键（含左右变体）、F1-F24、导航键、小键盘、标点
//! - 查询前统一转为小写，表内只存放小写别名
//! - 不做模糊匹配：未知名称返回 `None`
//!
//! # 使用示例
//!
//! ```
//! use keyfree_lib::input::keymap::{normalize, CanonicalKey, NamedKey};
//!
//! assert_eq!(normalize("Left_Ctrl"), Some(CanonicalKey::Named(NamedKey::LeftCtrl)));
//! assert_eq!(normalize("a"), Some(CanonicalKey::Character('a')));
//! assert_eq!(normalize("hyper"), None);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// 具名按键
///
/// 与平台无关的按键标识，由 [`crate::input::keyboard`] 转换为 enigo 按键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Ctrl,
    LeftCtrl,
    RightCtrl,
    Shift,
    LeftShift,
    RightShift,
    Alt,
    LeftAlt,
    RightAlt,
    Meta,
    LeftMeta,
    RightMeta,
    Enter,
    Space,
    Tab,
    Escape,
    Backspace,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    /// 功能键 F1-F24
    Function(u8),
}

/// 规范按键
///
/// 按键名称解析后的目标：字面字符、具名按键或 Windows 虚拟键码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalKey {
    /// 以字符方式注入
    Character(char),
    /// 具名按键
    Named(NamedKey),
    /// Windows 虚拟键码（小键盘等）
    VirtualKey(u16),
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanonicalKey::Character(c) => write!(f, "'{}'", c),
            CanonicalKey::Named(NamedKey::Function(n)) => write!(f, "F{}", n),
            CanonicalKey::Named(named) => write!(f, "{:?}", named),
            CanonicalKey::VirtualKey(vk) => write!(f, "VK(0x{:02X})", vk),
        }
    }
}

// Windows 小键盘虚拟键码
pub const VK_NUMPAD0: u16 = 0x60;
pub const VK_MULTIPLY: u16 = 0x6A;
pub const VK_ADD: u16 = 0x6B;
pub const VK_SUBTRACT: u16 = 0x6D;
pub const VK_DECIMAL: u16 = 0x6E;
pub const VK_DIVIDE: u16 = 0x6F;

const fn ch(c: char) -> CanonicalKey {
    CanonicalKey::Character(c)
}

const fn named(key: NamedKey) -> CanonicalKey {
    CanonicalKey::Named(key)
}

const fn fkey(n: u8) -> CanonicalKey {
    CanonicalKey::Named(NamedKey::Function(n))
}

const fn vk(code: u16) -> CanonicalKey {
    CanonicalKey::VirtualKey(code)
}

/// 按键别名表
///
/// 所有别名必须为小写
pub static KEY_TABLE: &[(&str, CanonicalKey)] = &[
    // Letters
    ("a", ch('a')), ("b", ch('b')), ("c", ch('c')), ("d", ch('d')), ("e", ch('e')),
    ("f", ch('f')), ("g", ch('g')), ("h", ch('h')), ("i", ch('i')), ("j", ch('j')),
    ("k", ch('k')), ("l", ch('l')), ("m", ch('m')), ("n", ch('n')), ("o", ch('o')),
    ("p", ch('p')), ("q", ch('q')), ("r", ch('r')), ("s", ch('s')), ("t", ch('t')),
    ("u", ch('u')), ("v", ch('v')), ("w", ch('w')), ("x", ch('x')), ("y", ch('y')),
    ("z", ch('z')),
    // Digits
    ("0", ch('0')), ("1", ch('1')), ("2", ch('2')), ("3", ch('3')), ("4", ch('4')),
    ("5", ch('5')), ("6", ch('6')), ("7", ch('7')), ("8", ch('8')), ("9", ch('9')),
    // Function keys
    ("f1", fkey(1)), ("f2", fkey(2)), ("f3", fkey(3)), ("f4", fkey(4)),
    ("f5", fkey(5)), ("f6", fkey(6)), ("f7", fkey(7)), ("f8", fkey(8)),
    ("f9", fkey(9)), ("f10", fkey(10)), ("f11", fkey(11)), ("f12", fkey(12)),
    ("f13", fkey(13)), ("f14", fkey(14)), ("f15", fkey(15)), ("f16", fkey(16)),
    ("f17", fkey(17)), ("f18", fkey(18)), ("f19", fkey(19)), ("f20", fkey(20)),
    ("f21", fkey(21)), ("f22", fkey(22)), ("f23", fkey(23)), ("f24", fkey(24)),
    // Modifiers
    ("ctrl", named(NamedKey::Ctrl)),
    ("left_ctrl", named(NamedKey::LeftCtrl)),
    ("right_ctrl", named(NamedKey::RightCtrl)),
    ("leftcontrol", named(NamedKey::LeftCtrl)),
    ("rightcontrol", named(NamedKey::RightCtrl)),
    ("shift", named(NamedKey::Shift)),
    ("left_shift", named(NamedKey::LeftShift)),
    ("right_shift", named(NamedKey::RightShift)),
    ("leftshift", named(NamedKey::LeftShift)),
    ("rightshift", named(NamedKey::RightShift)),
    ("alt", named(NamedKey::Alt)),
    ("left_alt", named(NamedKey::LeftAlt)),
    ("right_alt", named(NamedKey::RightAlt)),
    ("meta", named(NamedKey::Meta)),
    ("left_meta", named(NamedKey::LeftMeta)),
    ("right_meta", named(NamedKey::RightMeta)),
    ("windows", named(NamedKey::Meta)),
    ("left_windows", named(NamedKey::LeftMeta)),
    ("right_windows", named(NamedKey::RightMeta)),
    ("cmd", named(NamedKey::Meta)),
    ("left_cmd", named(NamedKey::LeftMeta)),
    ("right_cmd", named(NamedKey::RightMeta)),
    // Special keys
    ("enter", named(NamedKey::Enter)),
    ("return", named(NamedKey::Enter)),
    ("space", named(NamedKey::Space)),
    ("tab", named(NamedKey::Tab)),
    ("escape", named(NamedKey::Escape)),
    ("esc", named(NamedKey::Escape)),
    ("backspace", named(NamedKey::Backspace)),
    ("delete", named(NamedKey::Delete)),
    ("del", named(NamedKey::Delete)),
    ("insert", named(NamedKey::Insert)),
    ("ins", named(NamedKey::Insert)),
    ("home", named(NamedKey::Home)),
    ("end", named(NamedKey::End)),
    ("pageup", named(NamedKey::PageUp)),
    ("page_up", named(NamedKey::PageUp)),
    ("pagedown", named(NamedKey::PageDown)),
    ("page_down", named(NamedKey::PageDown)),
    // Arrows
    ("up", named(NamedKey::Up)),
    ("up_arrow", named(NamedKey::Up)),
    ("uparrow", named(NamedKey::Up)),
    ("down", named(NamedKey::Down)),
    ("down_arrow", named(NamedKey::Down)),
    ("downarrow", named(NamedKey::Down)),
    ("left", named(NamedKey::Left)),
    ("left_arrow", named(NamedKey::Left)),
    ("leftarrow", named(NamedKey::Left)),
    ("right", named(NamedKey::Right)),
    ("right_arrow", named(NamedKey::Right)),
    ("rightarrow", named(NamedKey::Right)),
    // Numpad
    ("keypad0", vk(VK_NUMPAD0)), ("keypad1", vk(VK_NUMPAD0 + 1)),
    ("keypad2", vk(VK_NUMPAD0 + 2)), ("keypad3", vk(VK_NUMPAD0 + 3)),
    ("keypad4", vk(VK_NUMPAD0 + 4)), ("keypad5", vk(VK_NUMPAD0 + 5)),
    ("keypad6", vk(VK_NUMPAD0 + 6)), ("keypad7", vk(VK_NUMPAD0 + 7)),
    ("keypad8", vk(VK_NUMPAD0 + 8)), ("keypad9", vk(VK_NUMPAD0 + 9)),
    ("keypadperiod", vk(VK_DECIMAL)),
    ("keypadenter", named(NamedKey::Enter)),
    ("keypadplus", vk(VK_ADD)),
    ("keypadminus", vk(VK_SUBTRACT)),
    ("keypadmultiply", vk(VK_MULTIPLY)),
    ("keypaddivide", vk(VK_DIVIDE)),
    // Punctuation and symbols
    ("comma", ch(',')), (",", ch(',')),
    ("period", ch('.')), (".", ch('.')),
    ("semicolon", ch(';')), (";", ch(';')),
    ("colon", ch(':')), (":", ch(':')),
    ("slash", ch('/')), ("/", ch('/')),
    ("backslash", ch('\\')), ("\\", ch('\\')),
    ("minus", ch('-')), ("-", ch('-')),
    ("equals", ch('=')), ("=", ch('=')),
    ("plus", ch('+')), ("+", ch('+')),
    ("underscore", ch('_')), ("_", ch('_')),
    ("bracket_left", ch('[')), ("[", ch('[')), ("leftbracket", ch('[')),
    ("bracket_right", ch(']')), ("]", ch(']')), ("rightbracket", ch(']')),
    ("brace_left", ch('{')), ("{", ch('{')),
    ("brace_right", ch('}')), ("}", ch('}')),
    ("pipe", ch('|')), ("|", ch('|')),
    ("tilde", ch('~')), ("~", ch('~')),
    ("backtick", ch('`')), ("`", ch('`')),
    ("quote", ch('\'')), ("'", ch('\'')),
    ("double_quote", ch('"')), ("\"", ch('"')),
    ("question", ch('?')), ("?", ch('?')),
    ("exclamation", ch('!')), ("!", ch('!')),
    ("at", ch('@')), ("@", ch('@')),
    ("hash", ch('#')), ("#", ch('#')),
    ("dollar", ch('$')), ("$", ch('$')),
    ("percent", ch('%')), ("%", ch('%')),
    ("caret", ch('^')), ("^", ch('^')),
    ("ampersand", ch('&')), ("&", ch('&')),
    ("asterisk", ch('*')), ("*", ch('*')),
    ("parenthesis_left", ch('(')), ("(", ch('(')),
    ("parenthesis_right", ch(')')), (")", ch(')')),
];

static KEY_INDEX: LazyLock<HashMap<&'static str, CanonicalKey>> =
    LazyLock::new(|| KEY_TABLE.iter().copied().collect());

/// 将按键名称规范化为 [`CanonicalKey`]
///
/// 查询前转换为小写；未知名称返回 `None`
pub fn normalize(token: &str) -> Option<CanonicalKey> {
    KEY_INDEX.get(token.to_lowercase().as_str()).copied()
}

/// 规范化一组按键名称
///
/// 全部成功才返回结果；否则返回所有无法识别的名称
///
/// # Errors
///
/// 返回无法识别的原始名称列表（保持输入顺序）
pub fn normalize_all<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<CanonicalKey>, Vec<String>> {
    let mut keys = Vec::with_capacity(tokens.len());
    let mut invalid = Vec::new();

    for token in tokens {
        match normalize(token.as_ref()) {
            Some(key) => keys.push(key),
            None => invalid.push(token.as_ref().to_string()),
        }
    }

    if invalid.is_empty() { Ok(keys) } else { Err(invalid) }
}

/// 获取所有可用的按键别名（已排序）
pub fn available_keys() -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = KEY_TABLE.iter().map(|(alias, _)| *alias).collect();
    keys.sort_unstable();
    keys
}
