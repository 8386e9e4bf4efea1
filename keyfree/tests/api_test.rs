//! HTTP 接口集成测试
//!
//! 使用内存后端驱动完整路由，不产生真实的键盘事件或音量变化

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use keyfree_lib::input::{CanonicalKey, InputWorker, NamedKey};
use keyfree_lib::server::{AppState, build_router};
use keyfree_lib::state::AppConfig;
use keyfree_lib::test_support::{KeyEvent, MemoryBackend, RecordingInjector};
use keyfree_lib::volume::{UnsupportedBackend, VolumeController};

struct Harness {
    router: Router,
    keys: RecordingInjector,
    audio: MemoryBackend,
}

fn harness() -> Harness {
    let keys = RecordingInjector::new();
    let audio = MemoryBackend::new();

    let injector = keys.clone();
    let input = InputWorker::spawn(move || Ok(injector)).unwrap();
    let volume = VolumeController::new(Arc::new(audio.clone()));
    let state = AppState::new(input, volume, Arc::new(AppConfig::default()));

    Harness {
        router: build_router(state),
        keys,
        audio,
    }
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            builder = builder.header("content-type", "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    let response = router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn post(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(router, Method::POST, uri, Some(body)).await
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, Method::GET, uri, None).await
}

const CTRL: CanonicalKey = CanonicalKey::Named(NamedKey::Ctrl);

// ==================== 基础接口 ====================

#[tokio::test]
async fn test_health() {
    let h = harness();
    let (status, body) = get(&h.router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["message"], "KeyFree Companion API is running");
    assert_eq!(body["version"], "1.0.0");
}

#[tokio::test]
async fn test_keys_maps_alias_to_itself() {
    let h = harness();
    let (status, body) = get(&h.router, "/api/keys").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["keys"]["ctrl"], "ctrl");
    assert_eq!(body["keys"]["f24"], "f24");
    assert_eq!(body["keys"]["keypad0"], "keypad0");
}

#[tokio::test]
async fn test_unknown_route() {
    let h = harness();
    let (status, body) = get(&h.router, "/api/nothing").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Endpoint not found" }));
}

// ==================== 键盘接口 ====================

#[tokio::test]
async fn test_single() {
    let h = harness();
    let (status, body) = post(&h.router, "/api/single", json!({ "key": "A" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "message": "Pressed key: A" }));

    let a = CanonicalKey::Character('a');
    assert_eq!(h.keys.events(), vec![KeyEvent::Press(a), KeyEvent::Release(a)]);
}

#[tokio::test]
async fn test_duo() {
    let h = harness();
    let (status, body) = post(&h.router, "/api/duo", json!({ "key1": "ctrl", "key2": "c" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Pressed combination: ctrl + c");

    let c = CanonicalKey::Character('c');
    assert_eq!(
        h.keys.events(),
        vec![
            KeyEvent::Press(CTRL),
            KeyEvent::Press(c),
            KeyEvent::Release(c),
            KeyEvent::Release(CTRL),
        ]
    );
}

#[tokio::test]
async fn test_quartet_and_chord() {
    let h = harness();

    let (status, body) = post(
        &h.router,
        "/api/quartet",
        json!({ "key1": "ctrl", "key2": "shift", "key3": "alt", "key4": "f5" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Pressed combination: ctrl + shift + alt + f5");
    assert_eq!(h.keys.events().len(), 8);

    let (status, body) = post(&h.router, "/api/chord", json!({ "keys": ["windows", "d"] })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Pressed combination: windows + d");
    assert!(h.keys.held().is_empty());
}

#[tokio::test]
async fn test_chord_size_limits() {
    let h = harness();

    let (status, _) = post(&h.router, "/api/chord", json!({ "keys": [] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(&h.router, "/api/chord", json!({ "keys": ["a", "b", "c", "d", "e"] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(h.keys.events().is_empty());
}

#[tokio::test]
async fn test_missing_parameters() {
    let h = harness();

    let (status, body) = post(&h.router, "/api/single", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Key parameter is required");

    let (status, body) = post(&h.router, "/api/trio", json!({ "key1": "ctrl", "key2": "shift" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "key1, key2, and key3 parameters are required");

    let (status, body) = post(&h.router, "/api/string", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Text parameter is required");

    assert!(h.keys.events().is_empty());
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let h = harness();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/single")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = h.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_key_is_not_found_and_presses_nothing() {
    let h = harness();
    let (status, body) = post(
        &h.router,
        "/api/trio",
        json!({ "key1": "ctrl", "key2": "shift", "key3": "nope" }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Invalid key(s): nope");
    assert!(h.keys.events().is_empty());
}

#[tokio::test]
async fn test_down_then_up() {
    let h = harness();

    let (_, body) = post(&h.router, "/api/down", json!({ "key": "shift" })).await;
    assert_eq!(body["message"], "Key down: shift");
    assert_eq!(h.keys.held(), vec![CanonicalKey::Named(NamedKey::Shift)]);

    let (_, body) = post(&h.router, "/api/up", json!({ "key": "shift" })).await;
    assert_eq!(body["message"], "Key up: shift");
    assert!(h.keys.held().is_empty());
}

#[tokio::test]
async fn test_string() {
    let h = harness();

    let (status, body) = post(&h.router, "/api/string", json!({ "text": "Hello" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Typed string: Hello");
    assert_eq!(h.keys.events(), vec![KeyEvent::Text("Hello".to_string())]);

    let (status, body) = post(&h.router, "/api/string", json!({ "text": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Text parameter must be a non-empty string");
}

// ==================== 音量接口 ====================

#[tokio::test]
async fn test_list_apps() {
    let h = harness();
    h.audio.add_system_session(1.0);
    h.audio.add_session(1234, "chrome.exe", 0.5);

    let (status, body) = get(&h.router, "/api/volume/apps").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "apps": [
                { "name": "System", "pid": 0, "volume": 1.0, "muted": false },
                { "name": "chrome.exe", "pid": 1234, "volume": 0.5, "muted": false },
            ]
        })
    );
}

#[tokio::test]
async fn test_set_volume_fans_out_by_name() {
    let h = harness();
    h.audio.add_session(1, "chrome.exe", 0.2);
    h.audio.add_session(2, "chrome.exe", 0.9);

    let (status, body) = post(&h.router, "/api/volume/set", json!({ "app": "chrome", "volume": 0.5 })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "success": true, "message": "Volume set to 50% (2 process(es))" })
    );
    assert_eq!(h.audio.volume_of(1), Some(0.5));
    assert_eq!(h.audio.volume_of(2), Some(0.5));
}

#[tokio::test]
async fn test_get_volume_query_and_body() {
    let h = harness();
    h.audio.add_session(42, "vlc.exe", 0.25);

    let (status, body) = get(&h.router, "/api/volume/get?app=vlc").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "volume": 0.25, "muted": false }));

    let (status, body) = post(&h.router, "/api/volume/get", json!({ "pid": 42 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["volume"], 0.25);

    let (status, body) = get(&h.router, "/api/volume/get?pid=9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "App not found: 9999");
}

#[tokio::test]
async fn test_pid_wins_over_app() {
    let h = harness();
    h.audio.add_session(1, "spotify.exe", 0.3);
    h.audio.add_session(2, "chrome.exe", 0.3);

    post(&h.router, "/api/volume/set", json!({ "app": "spotify", "pid": 2, "volume": 1.0 })).await;

    assert_eq!(h.audio.volume_of(1), Some(0.3));
    assert_eq!(h.audio.volume_of(2), Some(1.0));
}

#[tokio::test]
async fn test_volume_identifier_required() {
    let h = harness();

    let (status, body) = post(&h.router, "/api/volume/mute", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "app or pid parameter is required");

    let (status, body) = post(&h.router, "/api/volume/set", json!({ "pid": 1 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "volume parameter is required");
}

#[tokio::test]
async fn test_volume_steps_use_configured_default() {
    let h = harness();
    h.audio.add_session(7, "game.exe", 0.5);

    let (_, body) = post(&h.router, "/api/volume/up", json!({ "pid": 7 })).await;
    assert_eq!(body["message"], "Volume up");
    assert!((h.audio.volume_of(7).unwrap() - 0.6).abs() < 1e-6);

    post(&h.router, "/api/volume/down", json!({ "pid": 7, "amount": 0.6 })).await;
    assert_eq!(h.audio.volume_of(7), Some(0.0));
}

#[tokio::test]
async fn test_toggle_mute_reports_new_state() {
    let h = harness();
    h.audio.add_session(1, "firefox.exe", 0.5);
    h.audio.add_session(2, "firefox.exe", 0.5);
    h.audio.add_session(3, "firefox.exe", 0.5);
    h.audio.set_muted_of(2, true);

    let (status, body) = post(&h.router, "/api/volume/toggle-mute", json!({ "app": "firefox" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "success": true, "message": "Muted (3 process(es))", "muted": true })
    );
    assert_eq!(h.audio.muted_of(2), Some(true));
}

#[tokio::test]
async fn test_master_volume_endpoints() {
    let h = harness();
    h.audio.set_master(0.5, false);

    let (status, body) = get(&h.router, "/api/volume/master").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "volume": 0.5, "muted": false }));

    let (_, body) = post(&h.router, "/api/volume/master/set", json!({ "volume": 0.3 })).await;
    assert_eq!(body["message"], "Master volume set to 30%");

    // 请求体可省略
    let (status, body) = send(&h.router, Method::POST, "/api/volume/master/up", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Master volume up to 40%");

    let (_, body) = send(&h.router, Method::POST, "/api/volume/master/toggle-mute", None).await;
    assert_eq!(body["muted"], true);
    assert_eq!(h.audio.master_state().map(|(_, muted)| muted), Some(true));

    let (_, body) = send(&h.router, Method::POST, "/api/volume/master/unmute", None).await;
    assert_eq!(body["message"], "Master unmuted");
}

async fn post_raw(router: &Router, uri: &str, content_type: Option<&str>, body: &str) -> StatusCode {
    let mut builder = Request::builder().method(Method::POST).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }

    let request = builder.body(Body::from(body.to_string())).unwrap();
    router.clone().oneshot(request).await.unwrap().status()
}

#[tokio::test]
async fn test_master_step_rejects_bad_body() {
    let h = harness();
    h.audio.set_master(0.2, false);

    let (status, body) = post(&h.router, "/api/volume/master/up", json!({ "amount": "lots" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let json = Some("application/json");
    let status = post_raw(&h.router, "/api/volume/master/down", json, r#"{"amount":0.5"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let status = post_raw(&h.router, "/api/volume/master/up", None, r#"{"amount":0.5}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 被拒绝的请求不改变主音量
    assert_eq!(h.audio.master_state(), Some((0.2, false)));

    let (status, body) = post(&h.router, "/api/volume/master/up", json!({ "amount": 0.5 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Master volume up to 70%");
}

#[tokio::test]
async fn test_master_unavailable() {
    let h = harness();
    h.audio.remove_master();

    let (status, body) = get(&h.router, "/api/volume/master").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Master volume not available");
}

#[tokio::test]
async fn test_volume_unavailable_on_unsupported_platform() {
    let input = InputWorker::spawn(|| Ok(RecordingInjector::new())).unwrap();
    let volume = VolumeController::new(Arc::new(UnsupportedBackend));
    let state = AppState::new(input, volume, Arc::new(AppConfig::default()));
    let router = build_router(state);

    let (status, body) = get(&router, "/api/volume/apps").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Volume control not available");

    let (status, _) = post(&router, "/api/volume/set", json!({ "app": "chrome", "volume": 0.5 })).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _) = send(&router, Method::POST, "/api/volume/master/mute", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
