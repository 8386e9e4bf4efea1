//! HTTP 接口层
//!
//! 解析 JSON 请求，调用输入调度与音量操作，并将结果序列化为
//! `{success, message}` 或 `{error}`。
//!
//! # 路由
//!
//! | 路由 | 说明 |
//! |------|------|
//! | `GET /health` | 健康检查 |
//! | `GET /api/keys` | 所有按键别名 |
//! | `POST /api/single` `/api/down` `/api/up` | 单键 / 按下 / 释放 |
//! | `POST /api/duo` `/api/trio` `/api/quartet` `/api/chord` | 组合键 |
//! | `POST /api/string` | 输入文本 |
//! | `/api/volume/...` | 按应用音量 |
//! | `/api/volume/master/...` | 主音量 |
//!
//! 键盘事件由输入工作线程串行执行，音量操作在阻塞线程池中执行

mod error;
mod handlers;
mod state;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// 构建路由
pub fn build_router(state: AppState) -> Router {
    let cors = state.config.server.cors;

    let router = Router::new()
        .route("/health", get(handlers::health))
        .route("/api/keys", get(handlers::keys))
        .route("/api/single", post(handlers::single))
        .route("/api/duo", post(handlers::duo))
        .route("/api/trio", post(handlers::trio))
        .route("/api/quartet", post(handlers::quartet))
        .route("/api/chord", post(handlers::chord))
        .route("/api/down", post(handlers::down))
        .route("/api/up", post(handlers::up))
        .route("/api/string", post(handlers::type_string))
        .route("/api/volume/apps", get(handlers::list_apps))
        .route(
            "/api/volume/get",
            get(handlers::get_volume_query).post(handlers::get_volume_body),
        )
        .route("/api/volume/set", post(handlers::set_volume))
        .route("/api/volume/up", post(handlers::volume_up))
        .route("/api/volume/down", post(handlers::volume_down))
        .route("/api/volume/mute", post(handlers::mute))
        .route("/api/volume/unmute", post(handlers::unmute))
        .route("/api/volume/toggle-mute", post(handlers::toggle_mute))
        .route("/api/volume/master", get(handlers::master_volume))
        .route("/api/volume/master/set", post(handlers::set_master_volume))
        .route("/api/volume/master/up", post(handlers::master_volume_up))
        .route("/api/volume/master/down", post(handlers::master_volume_down))
        .route("/api/volume/master/mute", post(handlers::master_mute))
        .route("/api/volume/master/unmute", post(handlers::master_unmute))
        .route("/api/volume/master/toggle-mute", post(handlers::master_toggle_mute))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// 绑定地址并运行服务，直到收到 Ctrl+C
///
/// # Errors
///
/// 地址绑定失败或服务运行出错时返回 IO 错误
pub async fn serve(state: AppState, addr: &str) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(%local_addr, "KeyFree Companion API listening");
    tracing::info!("Health check: http://{}/health", local_addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        // 无法监听信号时保持运行
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
