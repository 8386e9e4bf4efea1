//! HTTP 错误响应
//!
//! 所有错误统一序列化为 `{"error": "..."}`，状态码由 [`AppError::status_code`] 决定

use axum::body::{self, Body};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, async_trait};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::utils::error::AppError;

/// 请求体大小上限，与 axum 默认值一致
const BODY_LIMIT: usize = 2 * 1024 * 1024;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(code = ?self.code(), error = %self, "Request failed");
        } else {
            tracing::debug!(code = ?self.code(), error = %self, "Request rejected");
        }

        let body = ErrorBody {
            error: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// JSON 请求体，解析失败时返回 400 `{error}`
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// 查询参数，解析失败时返回 400 `{error}`
#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct QueryParams<T>(pub T);

/// 可省略的 JSON 请求体
///
/// 空请求体为 `None`；非空时按 [`JsonBody`] 解析，内容类型或格式错误同样返回 400
pub struct OptionalJsonBody<T>(pub Option<T>);

#[async_trait]
impl<T, S> FromRequest<S> for OptionalJsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = req.into_parts();
        let bytes = body::to_bytes(body, BODY_LIMIT)
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read request body: {}", e)))?;

        if bytes.is_empty() {
            return Ok(Self(None));
        }

        let request = Request::from_parts(parts, Body::from(bytes));
        let JsonBody(value) = JsonBody::<T>::from_request(request, state).await?;
        Ok(Self(Some(value)))
    }
}
