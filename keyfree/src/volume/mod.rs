//! 按应用音量控制模块
//!
//! 提供对每个进程音频会话以及系统主音量的读取、设置、步进和静音操作。
//!
//! # 架构
//!
//! ```text
//! volume/
//! ├── mod.rs          - 模块入口和公共导出
//! ├── error.rs        - 错误类型定义
//! ├── session.rs      - 会话、后端 trait 与数据类型
//! ├── resolver.rs     - 按 PID / 进程名解析会话
//! ├── controller.rs   - 音量操作
//! └── platform/       - 平台后端（Windows WASAPI）
//! ```
//!
//! # 使用示例
//!
//! ```ignore
//! use keyfree_lib::volume::{VolumeController, default_backend};
//!
//! let controller = VolumeController::new(default_backend());
//! for app in controller.list_apps()? {
//!     println!("{} ({}): {}", app.name, app.pid, app.volume);
//! }
//! ```

pub mod controller;
pub mod error;
pub mod platform;
pub mod resolver;
pub mod session;

pub use controller::{DEFAULT_VOLUME_STEP, ToggleOutcome, VolumeController, clamp_unit};
pub use error::{VolumeError, VolumeResult};
pub use platform::{UnsupportedBackend, default_backend};
pub use resolver::resolve;
pub use session::{
    AppVolume, AudioBackend, AudioSession, SYSTEM_SESSION_NAME, VolumeControl, VolumeIdentifier,
    VolumeState,
};
