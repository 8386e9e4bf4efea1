//! 应用配置模块
//!
//! 提供服务配置的加载、保存和管理功能
//!
//! # 配置存储位置
//!
//! - Windows: `%APPDATA%/keyfree/config.json`
//! - macOS: `~/Library/Application Support/keyfree/config.json`
//! - Linux: `~/.config/keyfree/config.json`
//!
//! 命令行参数 `--host` / `--port` 优先于配置文件
//!
//! # 使用示例
//!
//! ```ignore
//! use keyfree_lib::state::config::{AppConfig, ConfigManager};
//!
//! let path = ConfigManager::default_path()?;
//! let mut config = ConfigManager::load(&path)?;
//! config.server.port = 8080;
//! ConfigManager::save(&path, &config)?;
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::volume::DEFAULT_VOLUME_STEP;

/// 配置目录名
const CONFIG_DIR_NAME: &str = "keyfree";

/// 配置文件名
const CONFIG_FILE_NAME: &str = "config.json";

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 序列化/反序列化错误
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// 路径错误
    #[error("Path error: {0}")]
    Path(String),
}

/// 配置结果类型
pub type ConfigResult<T> = Result<T, ConfigError>;

/// 应用配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP 服务配置
    pub server: ServerConfig,
    /// 音量配置
    pub volume: VolumeConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听地址
    pub host: String,
    /// 监听端口
    pub port: u16,
    /// 是否允许跨域请求
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            cors: true,
        }
    }
}

impl ServerConfig {
    /// 监听地址（`host:port`，主机名在绑定时解析）
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 音量配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeConfig {
    /// 未指定 `amount` 时的步进量
    pub default_step: f32,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            default_step: DEFAULT_VOLUME_STEP,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` 指令，`RUST_LOG` 优先
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "keyfree=info,keyfree_lib=info,tower_http=info,warn".to_string(),
        }
    }
}

/// 配置管理器
///
/// 提供配置的加载、保存和管理功能
pub struct ConfigManager;

impl ConfigManager {
    /// 加载配置
    ///
    /// 文件不存在时返回默认配置
    pub fn load(path: &Path) -> ConfigResult<AppConfig> {
        tracing::debug!(path = %path.display(), "Loading config");

        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: AppConfig = serde_json::from_str(&content)?;
            tracing::info!(path = %path.display(), "Config loaded successfully");
            Ok(config)
        } else {
            tracing::info!("Config file not found, using defaults");
            Ok(AppConfig::default())
        }
    }

    /// 启动时读取配置；`reset` 为真时不读取旧文件，直接写回默认配置
    ///
    /// 损坏的配置文件只能通过重置修复
    pub fn open(path: &Path, reset: bool) -> ConfigResult<AppConfig> {
        if reset {
            Self::reset(path)
        } else {
            Self::load(path)
        }
    }

    /// 保存配置，必要时创建目录
    pub fn save(path: &Path, config: &AppConfig) -> ConfigResult<()> {
        tracing::debug!(path = %path.display(), "Saving config");

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(config)?;
        std::fs::write(path, content)?;

        tracing::info!(path = %path.display(), "Config saved successfully");
        Ok(())
    }

    /// 获取默认配置文件路径
    pub fn default_path() -> ConfigResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| ConfigError::Path("Could not determine config directory".to_string()))
    }

    /// 重置为默认配置并写回文件
    pub fn reset(path: &Path) -> ConfigResult<AppConfig> {
        let config = AppConfig::default();
        Self::save(path, &config)?;
        tracing::info!("Config reset to defaults");
        Ok(config)
    }
}
