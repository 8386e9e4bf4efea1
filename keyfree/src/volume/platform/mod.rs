//! 平台音频后端
//!
//! # 架构
//!
//! ```text
//! platform/
//! ├── mod.rs          - 后端选择与不支持平台的占位实现
//! └── wasapi.rs       - Windows Core Audio (WASAPI) 实现
//! ```
//!
//! 非 Windows 平台使用 [`UnsupportedBackend`]，所有操作返回 `VolumeError::Unavailable`

#[cfg(target_os = "windows")]
pub mod wasapi;

use std::sync::Arc;

use crate::volume::error::{VolumeError, VolumeResult};
use crate::volume::session::{AudioBackend, AudioSession, VolumeControl};

/// 不支持按应用控制音量的平台
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedBackend;

impl AudioBackend for UnsupportedBackend {
    fn is_available(&self) -> bool {
        false
    }

    fn sessions(&self) -> VolumeResult<Vec<AudioSession>> {
        Err(VolumeError::Unavailable)
    }

    fn master(&self) -> VolumeResult<Box<dyn VolumeControl>> {
        Err(VolumeError::Unavailable)
    }
}

/// 获取当前平台的默认音频后端
pub fn default_backend() -> Arc<dyn AudioBackend> {
    #[cfg(target_os = "windows")]
    {
        Arc::new(wasapi::WasapiBackend)
    }

    #[cfg(not(target_os = "windows"))]
    {
        tracing::info!("Per-app volume control is only available on Windows");
        Arc::new(UnsupportedBackend)
    }
}
