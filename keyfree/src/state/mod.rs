//! 状态管理模块
//!
//! # 模块结构
//!
//! - `config` - 配置文件加载/保存

pub mod config;

pub use config::{
    AppConfig, ConfigError, ConfigManager, ConfigResult, LoggingConfig,
    ServerConfig, VolumeConfig,
};
