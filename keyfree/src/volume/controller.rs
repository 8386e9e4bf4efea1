//! 音量操作模块
//!
//! 对解析得到的一个或多个会话执行获取、设置、步进、静音操作
//!
//! # 规则
//!
//! - 设置值与步进量均钳制到 [0.0, 1.0]
//! - 按进程名解析时，写操作作用于所有匹配会话（扇出），消息中注明进程数
//! - 步进操作对每个会话独立读取、独立计算
//! - `toggle_mute` 读取第一个匹配会话的状态，取反后写入所有匹配会话
//! - 无匹配会话时返回 `VolumeError::AppNotFound`
//!
//! # 使用示例
//!
//! ```ignore
//! use keyfree_lib::volume::{VolumeController, default_backend};
//!
//! let controller = VolumeController::new(default_backend());
//! let message = controller.set_volume(&"chrome.exe".into(), 0.5)?;
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::volume::error::{VolumeError, VolumeResult};
use crate::volume::resolver;
use crate::volume::session::{
    AppVolume, AudioBackend, AudioSession, VolumeControl, VolumeIdentifier, VolumeState,
};

/// 默认音量步进
pub const DEFAULT_VOLUME_STEP: f32 = 0.1;

/// 静音切换结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleOutcome {
    /// 结果消息
    pub message: String,
    /// 切换后的静音状态
    pub muted: bool,
}

/// 音量控制器
///
/// 无跨请求状态，每次操作都重新枚举会话
#[derive(Clone)]
pub struct VolumeController {
    backend: Arc<dyn AudioBackend>,
}

impl VolumeController {
    /// 创建新的音量控制器
    pub fn new(backend: Arc<dyn AudioBackend>) -> Self {
        Self { backend }
    }

    /// 当前平台是否支持按应用控制音量
    pub fn is_available(&self) -> bool {
        self.backend.is_available()
    }

    /// 列出所有音频会话
    ///
    /// 读取失败的会话显示为音量 0、未静音
    pub fn list_apps(&self) -> VolumeResult<Vec<AppVolume>> {
        self.ensure_available()?;

        let apps = self
            .backend
            .sessions()?
            .iter()
            .map(|session| {
                let control = session.control();
                AppVolume {
                    name: session.display_name(),
                    pid: session.pid,
                    volume: round3(control.volume().unwrap_or(0.0)),
                    muted: control.is_muted().unwrap_or(false),
                }
            })
            .collect();

        Ok(apps)
    }

    /// 获取音量（使用第一个匹配会话）
    pub fn get_volume(&self, id: &VolumeIdentifier) -> VolumeResult<VolumeState> {
        let sessions = self.matches(id)?;
        let control = sessions[0].control();

        Ok(VolumeState {
            volume: round3(control.volume()?),
            muted: control.is_muted()?,
        })
    }

    /// 设置音量，作用于所有匹配会话
    pub fn set_volume(&self, id: &VolumeIdentifier, level: f32) -> VolumeResult<String> {
        let sessions = self.matches(id)?;
        let level = clamp_unit(level);

        for session in &sessions {
            session.control().set_volume(level)?;
        }

        Ok(format!("Volume set to {}%", percent(level)) + &process_suffix(sessions.len()))
    }

    /// 增加音量（默认步进 0.1）
    pub fn volume_up(&self, id: &VolumeIdentifier, amount: Option<f32>) -> VolumeResult<String> {
        let count = self.step(id, step_amount(amount))?;
        Ok("Volume up".to_string() + &process_suffix(count))
    }

    /// 降低音量（默认步进 0.1）
    pub fn volume_down(&self, id: &VolumeIdentifier, amount: Option<f32>) -> VolumeResult<String> {
        let count = self.step(id, -step_amount(amount))?;
        Ok("Volume down".to_string() + &process_suffix(count))
    }

    /// 设置静音状态，作用于所有匹配会话
    pub fn set_mute(&self, id: &VolumeIdentifier, muted: bool) -> VolumeResult<String> {
        let sessions = self.matches(id)?;

        for session in &sessions {
            session.control().set_muted(muted)?;
        }

        let message = if muted { "Muted" } else { "Unmuted" };
        Ok(message.to_string() + &process_suffix(sessions.len()))
    }

    /// 静音
    pub fn mute(&self, id: &VolumeIdentifier) -> VolumeResult<String> {
        self.set_mute(id, true)
    }

    /// 取消静音
    pub fn unmute(&self, id: &VolumeIdentifier) -> VolumeResult<String> {
        self.set_mute(id, false)
    }

    /// 切换静音
    ///
    /// 读取第一个匹配会话的静音状态，取反后写入所有匹配会话
    pub fn toggle_mute(&self, id: &VolumeIdentifier) -> VolumeResult<ToggleOutcome> {
        let muted = !self.get_volume(id)?.muted;
        let message = self.set_mute(id, muted)?;
        Ok(ToggleOutcome { message, muted })
    }

    /// 获取主音量
    pub fn master_volume(&self) -> VolumeResult<VolumeState> {
        let master = self.master()?;
        Ok(VolumeState {
            volume: round3(master.volume()?),
            muted: master.is_muted()?,
        })
    }

    /// 设置主音量
    pub fn set_master_volume(&self, level: f32) -> VolumeResult<String> {
        let master = self.master()?;
        let level = clamp_unit(level);
        master.set_volume(level)?;
        Ok(format!("Master volume set to {}%", percent(level)))
    }

    /// 增加主音量
    pub fn master_volume_up(&self, amount: Option<f32>) -> VolumeResult<String> {
        let master = self.master()?;
        let level = clamp_unit(master.volume()? + step_amount(amount));
        master.set_volume(level)?;
        Ok(format!("Master volume up to {}%", percent(level)))
    }

    /// 降低主音量
    pub fn master_volume_down(&self, amount: Option<f32>) -> VolumeResult<String> {
        let master = self.master()?;
        let level = clamp_unit(master.volume()? - step_amount(amount));
        master.set_volume(level)?;
        Ok(format!("Master volume down to {}%", percent(level)))
    }

    /// 设置主音量静音状态
    pub fn set_master_mute(&self, muted: bool) -> VolumeResult<String> {
        self.master()?.set_muted(muted)?;
        Ok(if muted { "Master muted" } else { "Master unmuted" }.to_string())
    }

    /// 切换主音量静音
    pub fn toggle_master_mute(&self) -> VolumeResult<ToggleOutcome> {
        let muted = !self.master_volume()?.muted;
        let message = self.set_master_mute(muted)?;
        Ok(ToggleOutcome { message, muted })
    }

    fn ensure_available(&self) -> VolumeResult<()> {
        if self.backend.is_available() {
            Ok(())
        } else {
            Err(VolumeError::Unavailable)
        }
    }

    fn matches(&self, id: &VolumeIdentifier) -> VolumeResult<Vec<AudioSession>> {
        self.ensure_available()?;

        let sessions = resolver::resolve(self.backend.as_ref(), id)?;
        if sessions.is_empty() {
            return Err(VolumeError::AppNotFound(id.to_string()));
        }
        Ok(sessions)
    }

    fn master(&self) -> VolumeResult<Box<dyn VolumeControl>> {
        self.ensure_available()?;
        self.backend.master()
    }

    /// 对每个会话独立读取当前值并步进
    fn step(&self, id: &VolumeIdentifier, delta: f32) -> VolumeResult<usize> {
        let sessions = self.matches(id)?;

        for session in &sessions {
            let control = session.control();
            let current = control.volume()?;
            control.set_volume(clamp_unit(current + delta))?;
        }

        Ok(sessions.len())
    }
}

/// 钳制到 [0.0, 1.0]；NaN 视为 0
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

fn step_amount(amount: Option<f32>) -> f32 {
    clamp_unit(amount.unwrap_or(DEFAULT_VOLUME_STEP))
}

fn round3(value: f32) -> f32 {
    (value * 1000.0).round() / 1000.0
}

/// 百分比截断取整（0.555 -> 55），先按千分位消除浮点误差
fn percent(level: f32) -> i32 {
    ((level * 1000.0).round() / 10.0).trunc() as i32
}

fn process_suffix(count: usize) -> String {
    if count > 1 {
        format!(" ({} process(es))", count)
    } else {
        String::new()
    }
}
