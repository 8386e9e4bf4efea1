use std::sync::Arc;

use crate::input::InputWorker;
use crate::state::AppConfig;
use crate::volume::VolumeController;

/// 请求处理器共享的状态
///
/// 所有字段都是廉价克隆的句柄，axum 为每个请求克隆一份
#[derive(Clone)]
pub struct AppState {
    /// 输入工作线程
    pub input: InputWorker,
    /// 音量控制器
    pub volume: VolumeController,
    /// 启动时加载的配置，运行期间只读
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(input: InputWorker, volume: VolumeController, config: Arc<AppConfig>) -> Self {
        Self {
            input,
            volume,
            config,
        }
    }
}
