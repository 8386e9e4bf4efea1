/// Key name normalization, keyboard injection and dispatch
pub mod input;

/// Per-app and master volume control
pub mod volume;

/// HTTP endpoint layer
pub mod server;

/// Configuration
pub mod state;

/// Utility modules
pub mod utils;

/// In-memory test doubles for the keyboard and audio backends
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

use std::sync::Arc;

use crate::input::{InputWorker, KeyboardSimulator};
use crate::server::AppState;
use crate::state::AppConfig;
use crate::utils::error::AppResult;
use crate::volume::{VolumeController, default_backend};

/// Wire the real keyboard and audio backends into shared server state
pub fn build_state(config: AppConfig) -> AppResult<AppState> {
    let input = InputWorker::spawn(KeyboardSimulator::new)?;
    let volume = VolumeController::new(default_backend());

    if !volume.is_available() {
        tracing::warn!("Volume endpoints will respond with 503 on this platform");
    }

    Ok(AppState::new(input, volume, Arc::new(config)))
}

/// Run the HTTP server until Ctrl+C
pub async fn run(config: AppConfig) -> AppResult<()> {
    let addr = config.server.bind_addr();
    let state = build_state(config)?;

    server::serve(state, &addr)
        .await
        .map_err(|e| utils::error::AppError::Internal(format!("Server error on {}: {}", addr, e)))
}
