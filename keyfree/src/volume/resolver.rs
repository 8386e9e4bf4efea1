//! 音频会话解析
//!
//! 根据进程 ID 或进程名在实时会话列表中查找匹配的会话
//!
//! - PID：返回第一个匹配的会话后立即停止扫描（PID 唯一）
//! - 进程名：去除首尾空白并转小写，匹配 `name` 或 `name + ".exe"`，返回所有匹配（扇出）
//! - 无所属进程的会话名为 `System`，可用 `"system"` 匹配
//! - 无匹配时返回空列表而非错误

use crate::volume::error::VolumeResult;
use crate::volume::session::{AudioBackend, AudioSession, VolumeIdentifier};

/// 解析标识符对应的所有会话
///
/// # Errors
///
/// 仅在底层会话枚举失败时返回错误
pub fn resolve(backend: &dyn AudioBackend, identifier: &VolumeIdentifier) -> VolumeResult<Vec<AudioSession>> {
    let sessions = backend.sessions()?;
    Ok(filter_sessions(sessions, identifier))
}

/// 从已枚举的会话中筛选匹配项
pub fn filter_sessions(sessions: Vec<AudioSession>, identifier: &VolumeIdentifier) -> Vec<AudioSession> {
    match identifier {
        VolumeIdentifier::Pid(pid) => sessions
            .into_iter()
            .find(|session| session.pid == *pid)
            .into_iter()
            .collect(),
        VolumeIdentifier::Name(name) => {
            let wanted = name.trim().to_lowercase();
            if wanted.is_empty() {
                return Vec::new();
            }

            sessions
                .into_iter()
                .filter(|session| matches_name(session, &wanted))
                .collect()
        }
    }
}

fn matches_name(session: &AudioSession, wanted: &str) -> bool {
    if session.is_system() {
        return wanted == "system";
    }

    match &session.process_name {
        Some(process_name) => {
            let process_name = process_name.to_lowercase();
            process_name == wanted
                || process_name
                    .strip_suffix(".exe")
                    .is_some_and(|stem| stem == wanted)
        }
        None => false,
    }
}
