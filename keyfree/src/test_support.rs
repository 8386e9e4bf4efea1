//! 测试替身
//!
//! - [`RecordingInjector`]：记录按键事件，可在第 N 个事件处注入失败
//! - [`MemoryBackend`]：内存中的音频会话列表和主音量
//!
//! 两者都可克隆，克隆共享同一份状态，测试可在交给被测对象后继续检查状态

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use crate::input::{CanonicalKey, InputError, InputResult, KeyInjector};
use crate::volume::{AudioBackend, AudioSession, VolumeControl, VolumeError, VolumeResult};

/// 记录的按键事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyEvent {
    Press(CanonicalKey),
    Release(CanonicalKey),
    Text(String),
}

#[derive(Debug, Default)]
struct Recording {
    events: Vec<(KeyEvent, Instant)>,
    held: Vec<CanonicalKey>,
    attempts: usize,
    fail_at: Option<usize>,
}

/// 记录按键事件的注入器
#[derive(Debug, Clone, Default)]
pub struct RecordingInjector {
    inner: Arc<Mutex<Recording>>,
}

impl RecordingInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// 第 `index` 个事件（从 0 开始）返回注入失败，失败的事件不记录
    pub fn failing_at(index: usize) -> Self {
        let injector = Self::new();
        injector.lock().fail_at = Some(index);
        injector
    }

    /// 已成功执行的事件
    pub fn events(&self) -> Vec<KeyEvent> {
        self.lock().events.iter().map(|(event, _)| event.clone()).collect()
    }

    /// 已成功执行的事件及其发生时刻
    pub fn timeline(&self) -> Vec<(KeyEvent, Instant)> {
        self.lock().events.clone()
    }

    /// 当前处于按下状态的按键（按下顺序）
    pub fn held(&self) -> Vec<CanonicalKey> {
        self.lock().held.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Recording> {
        // 测试中某个断言 panic 后仍允许读取记录
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, event: KeyEvent) -> InputResult<()> {
        let mut recording = self.lock();
        let attempt = recording.attempts;
        recording.attempts += 1;

        if recording.fail_at == Some(attempt) {
            return Err(InputError::KeyboardSimulationFailed(format!(
                "injected failure at event {}",
                attempt
            )));
        }

        match &event {
            KeyEvent::Press(key) => recording.held.push(*key),
            KeyEvent::Release(key) => recording.held.retain(|held| held != key),
            KeyEvent::Text(_) => {}
        }
        recording.events.push((event, Instant::now()));
        Ok(())
    }
}

impl KeyInjector for RecordingInjector {
    fn press(&mut self, key: CanonicalKey) -> InputResult<()> {
        self.record(KeyEvent::Press(key))
    }

    fn release(&mut self, key: CanonicalKey) -> InputResult<()> {
        self.record(KeyEvent::Release(key))
    }

    fn type_text(&mut self, text: &str) -> InputResult<()> {
        self.record(KeyEvent::Text(text.to_string()))
    }
}

#[derive(Debug, Clone)]
struct MemorySession {
    pid: u32,
    name: Option<String>,
    volume: f32,
    muted: bool,
}

#[derive(Debug)]
struct MemoryState {
    sessions: Vec<MemorySession>,
    master: Option<(f32, bool)>,
    fail_enumeration: bool,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            sessions: Vec::new(),
            master: Some((1.0, false)),
            fail_enumeration: false,
        }
    }
}

/// 内存音频后端
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加无所属进程的系统声音会话（pid 0）
    pub fn add_system_session(&self, volume: f32) {
        self.push(MemorySession {
            pid: 0,
            name: None,
            volume,
            muted: false,
        });
    }

    /// 添加进程会话
    pub fn add_session(&self, pid: u32, name: &str, volume: f32) {
        self.push(MemorySession {
            pid,
            name: Some(name.to_string()),
            volume,
            muted: false,
        });
    }

    /// 让后续会话枚举失败
    pub fn fail_enumeration(&self, fail: bool) {
        self.lock().fail_enumeration = fail;
    }

    /// 设置主音量状态
    pub fn set_master(&self, volume: f32, muted: bool) {
        self.lock().master = Some((volume, muted));
    }

    /// 移除默认播放设备
    pub fn remove_master(&self) {
        self.lock().master = None;
    }

    /// 第一个 pid 匹配会话的音量
    pub fn volume_of(&self, pid: u32) -> Option<f32> {
        self.lock().sessions.iter().find(|s| s.pid == pid).map(|s| s.volume)
    }

    /// 第一个 pid 匹配会话的静音状态
    pub fn muted_of(&self, pid: u32) -> Option<bool> {
        self.lock().sessions.iter().find(|s| s.pid == pid).map(|s| s.muted)
    }

    /// 设置第一个 pid 匹配会话的静音状态
    pub fn set_muted_of(&self, pid: u32, muted: bool) {
        if let Some(session) = self.lock().sessions.iter_mut().find(|s| s.pid == pid) {
            session.muted = muted;
        }
    }

    /// 主音量状态
    pub fn master_state(&self) -> Option<(f32, bool)> {
        self.lock().master
    }

    fn push(&self, session: MemorySession) {
        self.lock().sessions.push(session);
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AudioBackend for MemoryBackend {
    fn sessions(&self) -> VolumeResult<Vec<AudioSession>> {
        let state = self.lock();
        if state.fail_enumeration {
            return Err(VolumeError::Backend("enumeration failed".to_string()));
        }

        let sessions = state
            .sessions
            .iter()
            .enumerate()
            .map(|(index, session)| {
                let control = MemoryControl {
                    state: Arc::clone(&self.state),
                    target: Target::Session(index),
                };
                AudioSession::new(session.pid, session.name.clone(), Box::new(control))
            })
            .collect();

        Ok(sessions)
    }

    fn master(&self) -> VolumeResult<Box<dyn VolumeControl>> {
        if self.lock().master.is_none() {
            return Err(VolumeError::MasterUnavailable);
        }

        Ok(Box::new(MemoryControl {
            state: Arc::clone(&self.state),
            target: Target::Master,
        }))
    }
}

#[derive(Debug, Clone, Copy)]
enum Target {
    Session(usize),
    Master,
}

/// 按索引指向共享状态的音量控制句柄
struct MemoryControl {
    state: Arc<Mutex<MemoryState>>,
    target: Target,
}

impl MemoryControl {
    fn with<T>(&self, f: impl FnOnce(&mut f32, &mut bool) -> T) -> VolumeResult<T> {
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        match self.target {
            Target::Session(index) => state
                .sessions
                .get_mut(index)
                .map(|session| f(&mut session.volume, &mut session.muted))
                .ok_or_else(|| VolumeError::Backend("session expired".to_string())),
            Target::Master => state
                .master
                .as_mut()
                .map(|(volume, muted)| f(volume, muted))
                .ok_or(VolumeError::MasterUnavailable),
        }
    }
}

impl VolumeControl for MemoryControl {
    fn volume(&self) -> VolumeResult<f32> {
        self.with(|volume, _| *volume)
    }

    fn set_volume(&self, level: f32) -> VolumeResult<()> {
        self.with(|volume, _| *volume = level)
    }

    fn is_muted(&self) -> VolumeResult<bool> {
        self.with(|_, muted| *muted)
    }

    fn set_muted(&self, value: bool) -> VolumeResult<()> {
        self.with(|_, muted| *muted = value)
    }
}
