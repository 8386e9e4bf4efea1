//! Windows Core Audio (WASAPI) 音频后端
//!
//! - 会话：默认播放设备上的 `IAudioSessionManager2` 会话枚举，
//!   音量通过 `ISimpleAudioVolume` 读写
//! - 主音量：默认播放设备的 `IAudioEndpointVolume`（标量音量）
//!
//! 每次调用都在当前线程初始化 COM 并重新枚举，COM 对象不跨线程传递

#![cfg(target_os = "windows")]

use std::ptr;

use windows::Win32::Foundation::{BOOL, CloseHandle, FALSE};
use windows::Win32::Media::Audio::Endpoints::IAudioEndpointVolume;
use windows::Win32::Media::Audio::{
    IAudioSessionControl, IAudioSessionControl2, IAudioSessionManager2, IMMDevice,
    IMMDeviceEnumerator, ISimpleAudioVolume, MMDeviceEnumerator, eConsole, eRender,
};
use windows::Win32::System::Com::{
    CLSCTX_ALL, COINIT_MULTITHREADED, CoCreateInstance, CoInitializeEx,
};
use windows::Win32::System::Threading::{
    OpenProcess, PROCESS_NAME_FORMAT, PROCESS_QUERY_LIMITED_INFORMATION,
    QueryFullProcessImageNameW,
};
use windows::core::{Interface, PWSTR};

use crate::volume::error::{VolumeError, VolumeResult};
use crate::volume::session::{AudioBackend, AudioSession, VolumeControl};

/// WASAPI 后端
#[derive(Debug, Clone, Copy, Default)]
pub struct WasapiBackend;

impl AudioBackend for WasapiBackend {
    fn sessions(&self) -> VolumeResult<Vec<AudioSession>> {
        let device = default_render_device()?;

        unsafe {
            let manager = device
                .Activate::<IAudioSessionManager2>(CLSCTX_ALL, None)
                .map_err(|e| backend_error("activate session manager", e))?;
            let enumerator = manager
                .GetSessionEnumerator()
                .map_err(|e| backend_error("get session enumerator", e))?;
            let count = enumerator
                .GetCount()
                .map_err(|e| backend_error("get session count", e))?;

            let mut sessions = Vec::with_capacity(count.max(0) as usize);
            for index in 0..count {
                let control = match enumerator.GetSession(index) {
                    Ok(control) => control,
                    Err(e) => {
                        tracing::debug!(index, error = %e, "Skipping unreadable audio session");
                        continue;
                    }
                };

                if let Some(session) = build_session(&control) {
                    sessions.push(session);
                }
            }

            tracing::trace!(count = sessions.len(), "Enumerated audio sessions");
            Ok(sessions)
        }
    }

    fn master(&self) -> VolumeResult<Box<dyn VolumeControl>> {
        let device = default_render_device().map_err(|e| {
            tracing::warn!(error = %e, "Default playback device not available");
            VolumeError::MasterUnavailable
        })?;

        let endpoint = unsafe { device.Activate::<IAudioEndpointVolume>(CLSCTX_ALL, None) }
            .map_err(|e| {
                tracing::warn!(error = %e, "Failed to activate endpoint volume");
                VolumeError::MasterUnavailable
            })?;

        Ok(Box::new(EndpointVolume(endpoint)))
    }
}

/// 单个会话的音量控制
struct SessionVolume(ISimpleAudioVolume);

impl VolumeControl for SessionVolume {
    fn volume(&self) -> VolumeResult<f32> {
        unsafe { self.0.GetMasterVolume() }.map_err(|e| backend_error("get session volume", e))
    }

    fn set_volume(&self, level: f32) -> VolumeResult<()> {
        unsafe { self.0.SetMasterVolume(level, ptr::null()) }
            .map_err(|e| backend_error("set session volume", e))
    }

    fn is_muted(&self) -> VolumeResult<bool> {
        unsafe { self.0.GetMute() }
            .map(|muted| muted.as_bool())
            .map_err(|e| backend_error("get session mute", e))
    }

    fn set_muted(&self, muted: bool) -> VolumeResult<()> {
        unsafe { self.0.SetMute(BOOL::from(muted), ptr::null()) }
            .map_err(|e| backend_error("set session mute", e))
    }
}

/// 默认播放设备的主音量
struct EndpointVolume(IAudioEndpointVolume);

impl VolumeControl for EndpointVolume {
    fn volume(&self) -> VolumeResult<f32> {
        unsafe { self.0.GetMasterVolumeLevelScalar() }
            .map_err(|e| backend_error("get master volume", e))
    }

    fn set_volume(&self, level: f32) -> VolumeResult<()> {
        unsafe { self.0.SetMasterVolumeLevelScalar(level, ptr::null()) }
            .map_err(|e| backend_error("set master volume", e))
    }

    fn is_muted(&self) -> VolumeResult<bool> {
        unsafe { self.0.GetMute() }
            .map(|muted| muted.as_bool())
            .map_err(|e| backend_error("get master mute", e))
    }

    fn set_muted(&self, muted: bool) -> VolumeResult<()> {
        unsafe { self.0.SetMute(BOOL::from(muted), ptr::null()) }
            .map_err(|e| backend_error("set master mute", e))
    }
}

fn default_render_device() -> VolumeResult<IMMDevice> {
    unsafe {
        // 已初始化时返回 S_FALSE / RPC_E_CHANGED_MODE，均可忽略
        let _ = CoInitializeEx(None, COINIT_MULTITHREADED);

        let enumerator: IMMDeviceEnumerator = CoCreateInstance(&MMDeviceEnumerator, None, CLSCTX_ALL)
            .map_err(|e| backend_error("create device enumerator", e))?;

        enumerator
            .GetDefaultAudioEndpoint(eRender, eConsole)
            .map_err(|e| backend_error("get default audio endpoint", e))
    }
}

/// 从会话控制对象构建 [`AudioSession`]，无法获取音量接口时跳过
fn build_session(control: &IAudioSessionControl) -> Option<AudioSession> {
    let volume = match control.cast::<ISimpleAudioVolume>() {
        Ok(volume) => volume,
        Err(e) => {
            tracing::debug!(error = %e, "Session has no volume interface");
            return None;
        }
    };

    let pid = control
        .cast::<IAudioSessionControl2>()
        .and_then(|control2| unsafe { control2.GetProcessId() })
        .unwrap_or(0);

    let process_name = if pid == 0 {
        None
    } else {
        process_name(pid)
    };

    Some(AudioSession::new(pid, process_name, Box::new(SessionVolume(volume))))
}

/// 查询进程可执行文件名（不含路径）
fn process_name(pid: u32) -> Option<String> {
    let handle = unsafe { OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, FALSE, pid) }.ok()?;

    let mut buf = [0u16; 260];
    let mut len = buf.len() as u32;
    let result = unsafe {
        QueryFullProcessImageNameW(handle, PROCESS_NAME_FORMAT(0), PWSTR(buf.as_mut_ptr()), &mut len)
    };
    let _ = unsafe { CloseHandle(handle) };

    if result.is_err() {
        tracing::trace!(pid, "Process name not available");
        return None;
    }

    let path = String::from_utf16_lossy(&buf[..len as usize]);
    path.rsplit('\\')
        .next()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

fn backend_error(action: &str, error: windows::core::Error) -> VolumeError {
    VolumeError::Backend(format!("Failed to {}: {}", action, error))
}
