use std::collections::BTreeMap;

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::input::{InputCommand, available_keys};
use crate::utils::error::{AppError, AppResult};
use crate::volume::{AppVolume, ToggleOutcome, VolumeController, VolumeIdentifier, VolumeResult, VolumeState};

use super::error::{JsonBody, OptionalJsonBody, QueryParams};
use super::state::AppState;

#[derive(Serialize)]
pub(super) struct HealthResponse {
    status: &'static str,
    message: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
pub(super) struct KeysResponse {
    keys: BTreeMap<&'static str, &'static str>,
}

#[derive(Debug, Serialize)]
pub(super) struct ActionResponse {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    muted: Option<bool>,
}

impl ActionResponse {
    fn ok(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            muted: None,
        })
    }
}

impl From<ToggleOutcome> for ActionResponse {
    fn from(outcome: ToggleOutcome) -> Self {
        Self {
            success: true,
            message: outcome.message,
            muted: Some(outcome.muted),
        }
    }
}

#[derive(Serialize)]
pub(super) struct AppsResponse {
    apps: Vec<AppVolume>,
}

#[derive(Deserialize)]
pub(super) struct KeyRequest {
    key: Option<String>,
}

#[derive(Deserialize)]
pub(super) struct ComboRequest {
    key1: Option<String>,
    key2: Option<String>,
    key3: Option<String>,
    key4: Option<String>,
}

#[derive(Deserialize)]
pub(super) struct ChordRequest {
    keys: Option<Vec<String>>,
}

#[derive(Deserialize)]
pub(super) struct TextRequest {
    text: Option<String>,
}

/// 音量请求参数；`pid` 与 `app` 同时给出时 `pid` 优先
#[derive(Debug, Default, Deserialize)]
pub(super) struct VolumeRequest {
    app: Option<String>,
    pid: Option<u32>,
    volume: Option<f32>,
    amount: Option<f32>,
}

impl VolumeRequest {
    fn identifier(&self) -> AppResult<VolumeIdentifier> {
        if let Some(pid) = self.pid {
            return Ok(VolumeIdentifier::Pid(pid));
        }

        match self.app.as_deref().map(str::trim) {
            Some(app) if !app.is_empty() => Ok(VolumeIdentifier::Name(app.to_string())),
            _ => Err(AppError::Validation("app or pid parameter is required".to_string())),
        }
    }

    fn level(&self) -> AppResult<f32> {
        self.volume
            .ok_or_else(|| AppError::Validation("volume parameter is required".to_string()))
    }
}

fn required(value: Option<String>, message: &str) -> AppResult<String> {
    value.ok_or_else(|| AppError::Validation(message.to_string()))
}

/// 在阻塞线程池中执行音量操作（COM 调用会阻塞且线程相关）
async fn run_volume<T, F>(state: &AppState, operation: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce(&VolumeController) -> VolumeResult<T> + Send + 'static,
{
    let controller = state.volume.clone();

    tokio::task::spawn_blocking(move || operation(&controller))
        .await
        .map_err(|e| AppError::Internal(format!("Volume task failed: {}", e)))?
        .map_err(AppError::from)
}

fn step(state: &AppState, amount: Option<f32>) -> Option<f32> {
    Some(amount.unwrap_or_else(|| state.config.volume.default_step))
}

pub(super) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "KeyFree Companion API is running",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub(super) async fn keys() -> Json<KeysResponse> {
    let keys = available_keys().into_iter().map(|key| (key, key)).collect();
    Json(KeysResponse { keys })
}

pub(super) async fn single(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<KeyRequest>,
) -> AppResult<Json<ActionResponse>> {
    let key = required(body.key, "Key parameter is required")?;
    state.input.execute(InputCommand::Single(key.clone())).await?;
    Ok(ActionResponse::ok(format!("Pressed key: {}", key)))
}

pub(super) async fn duo(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ComboRequest>,
) -> AppResult<Json<ActionResponse>> {
    let message = "key1 and key2 parameters are required";
    let keys = vec![required(body.key1, message)?, required(body.key2, message)?];
    press_combination(&state, keys).await
}

pub(super) async fn trio(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ComboRequest>,
) -> AppResult<Json<ActionResponse>> {
    let message = "key1, key2, and key3 parameters are required";
    let keys = vec![
        required(body.key1, message)?,
        required(body.key2, message)?,
        required(body.key3, message)?,
    ];
    press_combination(&state, keys).await
}

pub(super) async fn quartet(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ComboRequest>,
) -> AppResult<Json<ActionResponse>> {
    let message = "key1, key2, key3, and key4 parameters are required";
    let keys = vec![
        required(body.key1, message)?,
        required(body.key2, message)?,
        required(body.key3, message)?,
        required(body.key4, message)?,
    ];
    press_combination(&state, keys).await
}

pub(super) async fn chord(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ChordRequest>,
) -> AppResult<Json<ActionResponse>> {
    let keys = body
        .keys
        .ok_or_else(|| AppError::Validation("keys parameter is required".to_string()))?;
    press_combination(&state, keys).await
}

async fn press_combination(state: &AppState, keys: Vec<String>) -> AppResult<Json<ActionResponse>> {
    let message = format!("Pressed combination: {}", keys.join(" + "));
    state.input.execute(InputCommand::Chord(keys)).await?;
    Ok(ActionResponse::ok(message))
}

pub(super) async fn down(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<KeyRequest>,
) -> AppResult<Json<ActionResponse>> {
    let key = required(body.key, "Key parameter is required")?;
    state.input.execute(InputCommand::Down(key.clone())).await?;
    Ok(ActionResponse::ok(format!("Key down: {}", key)))
}

pub(super) async fn up(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<KeyRequest>,
) -> AppResult<Json<ActionResponse>> {
    let key = required(body.key, "Key parameter is required")?;
    state.input.execute(InputCommand::Up(key.clone())).await?;
    Ok(ActionResponse::ok(format!("Key up: {}", key)))
}

pub(super) async fn type_string(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<TextRequest>,
) -> AppResult<Json<ActionResponse>> {
    let text = required(body.text, "Text parameter is required")?;
    state.input.execute(InputCommand::Text(text.clone())).await?;
    Ok(ActionResponse::ok(format!("Typed string: {}", text)))
}

pub(super) async fn list_apps(State(state): State<AppState>) -> AppResult<Json<AppsResponse>> {
    let apps = run_volume(&state, |volume| volume.list_apps()).await?;
    Ok(Json(AppsResponse { apps }))
}

pub(super) async fn get_volume_query(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<VolumeRequest>,
) -> AppResult<Json<VolumeState>> {
    get_volume_for(&state, params).await
}

pub(super) async fn get_volume_body(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<VolumeRequest>,
) -> AppResult<Json<VolumeState>> {
    get_volume_for(&state, body).await
}

async fn get_volume_for(state: &AppState, request: VolumeRequest) -> AppResult<Json<VolumeState>> {
    let id = request.identifier()?;
    let volume = run_volume(state, move |volume| volume.get_volume(&id)).await?;
    Ok(Json(volume))
}

pub(super) async fn set_volume(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<VolumeRequest>,
) -> AppResult<Json<ActionResponse>> {
    let id = body.identifier()?;
    let level = body.level()?;
    let message = run_volume(&state, move |volume| volume.set_volume(&id, level)).await?;
    Ok(ActionResponse::ok(message))
}

pub(super) async fn volume_up(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<VolumeRequest>,
) -> AppResult<Json<ActionResponse>> {
    let id = body.identifier()?;
    let amount = step(&state, body.amount);
    let message = run_volume(&state, move |volume| volume.volume_up(&id, amount)).await?;
    Ok(ActionResponse::ok(message))
}

pub(super) async fn volume_down(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<VolumeRequest>,
) -> AppResult<Json<ActionResponse>> {
    let id = body.identifier()?;
    let amount = step(&state, body.amount);
    let message = run_volume(&state, move |volume| volume.volume_down(&id, amount)).await?;
    Ok(ActionResponse::ok(message))
}

pub(super) async fn mute(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<VolumeRequest>,
) -> AppResult<Json<ActionResponse>> {
    let id = body.identifier()?;
    let message = run_volume(&state, move |volume| volume.mute(&id)).await?;
    Ok(ActionResponse::ok(message))
}

pub(super) async fn unmute(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<VolumeRequest>,
) -> AppResult<Json<ActionResponse>> {
    let id = body.identifier()?;
    let message = run_volume(&state, move |volume| volume.unmute(&id)).await?;
    Ok(ActionResponse::ok(message))
}

pub(super) async fn toggle_mute(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<VolumeRequest>,
) -> AppResult<Json<ActionResponse>> {
    let id = body.identifier()?;
    let outcome = run_volume(&state, move |volume| volume.toggle_mute(&id)).await?;
    Ok(Json(outcome.into()))
}

pub(super) async fn master_volume(State(state): State<AppState>) -> AppResult<Json<VolumeState>> {
    let volume = run_volume(&state, |volume| volume.master_volume()).await?;
    Ok(Json(volume))
}

pub(super) async fn set_master_volume(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<VolumeRequest>,
) -> AppResult<Json<ActionResponse>> {
    let level = body.level()?;
    let message = run_volume(&state, move |volume| volume.set_master_volume(level)).await?;
    Ok(ActionResponse::ok(message))
}

/// 主音量步进的请求体可省略
pub(super) async fn master_volume_up(
    State(state): State<AppState>,
    OptionalJsonBody(body): OptionalJsonBody<VolumeRequest>,
) -> AppResult<Json<ActionResponse>> {
    let amount = step(&state, body.and_then(|body| body.amount));
    let message = run_volume(&state, move |volume| volume.master_volume_up(amount)).await?;
    Ok(ActionResponse::ok(message))
}

pub(super) async fn master_volume_down(
    State(state): State<AppState>,
    OptionalJsonBody(body): OptionalJsonBody<VolumeRequest>,
) -> AppResult<Json<ActionResponse>> {
    let amount = step(&state, body.and_then(|body| body.amount));
    let message = run_volume(&state, move |volume| volume.master_volume_down(amount)).await?;
    Ok(ActionResponse::ok(message))
}

pub(super) async fn master_mute(State(state): State<AppState>) -> AppResult<Json<ActionResponse>> {
    let message = run_volume(&state, |volume| volume.set_master_mute(true)).await?;
    Ok(ActionResponse::ok(message))
}

pub(super) async fn master_unmute(State(state): State<AppState>) -> AppResult<Json<ActionResponse>> {
    let message = run_volume(&state, |volume| volume.set_master_mute(false)).await?;
    Ok(ActionResponse::ok(message))
}

pub(super) async fn master_toggle_mute(
    State(state): State<AppState>,
) -> AppResult<Json<ActionResponse>> {
    let outcome = run_volume(&state, |volume| volume.toggle_master_mute()).await?;
    Ok(Json(outcome.into()))
}

pub(super) async fn not_found() -> AppError {
    AppError::EndpointNotFound
}
