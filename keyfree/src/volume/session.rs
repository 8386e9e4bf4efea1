use std::fmt;

use serde::{Deserialize, Serialize};

use crate::volume::error::VolumeResult;

/// Display name for sessions without an owning process
pub const SYSTEM_SESSION_NAME: &str = "System";

/// Live volume/mute control for one audio stream
///
/// Every call reads or writes OS state directly; nothing is cached.
pub trait VolumeControl {
    /// Current level in [0.0, 1.0]
    fn volume(&self) -> VolumeResult<f32>;

    /// Set level; callers pass an already clamped value
    fn set_volume(&self, level: f32) -> VolumeResult<()>;

    /// Current mute flag
    fn is_muted(&self) -> VolumeResult<bool>;

    /// Set mute flag
    fn set_muted(&self, muted: bool) -> VolumeResult<()>;
}

/// Platform audio capability
///
/// Implementations enumerate the live session list on every call. Session
/// handles are only valid on the thread that enumerated them.
pub trait AudioBackend: Send + Sync {
    /// Whether per-app volume control works on this platform
    fn is_available(&self) -> bool {
        true
    }

    /// Enumerate all live audio sessions
    fn sessions(&self) -> VolumeResult<Vec<AudioSession>>;

    /// Volume control of the default playback endpoint
    fn master(&self) -> VolumeResult<Box<dyn VolumeControl>>;
}

/// One live per-process audio session
pub struct AudioSession {
    /// Owning process id, 0 when unknown
    pub pid: u32,
    /// Executable name of the owning process, `None` for the system sounds session
    pub process_name: Option<String>,
    control: Box<dyn VolumeControl>,
}

impl AudioSession {
    /// Create a session handle
    pub fn new(pid: u32, process_name: Option<String>, control: Box<dyn VolumeControl>) -> Self {
        Self {
            pid,
            process_name,
            control,
        }
    }

    /// Whether no process owns this session
    pub fn is_system(&self) -> bool {
        self.process_name.is_none() && self.pid == 0
    }

    /// Name shown to API clients
    pub fn display_name(&self) -> String {
        match &self.process_name {
            Some(name) => name.clone(),
            None if self.pid == 0 => SYSTEM_SESSION_NAME.to_string(),
            None => format!("PID {}", self.pid),
        }
    }

    /// Volume control of this session
    pub fn control(&self) -> &dyn VolumeControl {
        self.control.as_ref()
    }
}

impl fmt::Debug for AudioSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioSession")
            .field("pid", &self.pid)
            .field("process_name", &self.process_name)
            .finish_non_exhaustive()
    }
}

/// Identifies the sessions a volume operation acts on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VolumeIdentifier {
    /// Process id; matches at most one session
    Pid(u32),
    /// Process name, with or without `.exe`; may match many sessions
    Name(String),
}

impl fmt::Display for VolumeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolumeIdentifier::Pid(pid) => write!(f, "{}", pid),
            VolumeIdentifier::Name(name) => write!(f, "{}", name),
        }
    }
}

impl From<u32> for VolumeIdentifier {
    fn from(pid: u32) -> Self {
        VolumeIdentifier::Pid(pid)
    }
}

impl From<&str> for VolumeIdentifier {
    fn from(name: &str) -> Self {
        VolumeIdentifier::Name(name.to_string())
    }
}

impl From<String> for VolumeIdentifier {
    fn from(name: String) -> Self {
        VolumeIdentifier::Name(name)
    }
}

/// Volume and mute state of one target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeState {
    /// Level in [0.0, 1.0], rounded to 3 decimals
    pub volume: f32,
    /// Mute flag
    pub muted: bool,
}

/// One row of the audio application list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppVolume {
    /// Display name (`System` for the system sounds session)
    pub name: String,
    /// Process id
    pub pid: u32,
    /// Level in [0.0, 1.0], rounded to 3 decimals
    pub volume: f32,
    /// Mute flag
    pub muted: bool,
}
