// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 查询接口处理器

use crate::domain::models::SearchMode;
use crate::domain::repositories::RepositoryError;
use crate::presentation::routes::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

/// 单次查询返回的最大条数
const SEARCH_LIMIT: i64 = 50;

/// 接口层错误，统一转成JSON错误响应
pub enum ApiError {
    BadRequest(&'static str),
    NotFound(&'static str),
    Internal(RepositoryError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.to_string()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.to_string()),
            ApiError::Internal(e) => {
                error!("仓储查询失败: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        ApiError::Internal(e)
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// 关键词，必填
    pub q: Option<String>,
    /// 可选模式：`image` 或 `text`，其余值视为全部
    pub mode: Option<String>,
}

/// GET /api/search?q=...&mode=...
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or(ApiError::BadRequest("missing query parameter `q`"))?;

    let mode = SearchMode::parse(params.mode.as_deref());
    let results = state.repository.search(query, mode, SEARCH_LIMIT).await?;

    Ok(Json(json!({
        "query": query,
        "count": results.len(),
        "results": results,
    })))
}

/// GET /api/random?mode=...
pub async fn random(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let mode = SearchMode::parse(params.mode.as_deref());
    let meme = state
        .repository
        .random(mode)
        .await?
        .ok_or(ApiError::NotFound("no memes available"))?;
    Ok(Json(meme))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let count = state.repository.count().await?;
    Ok(Json(json!({ "status": "ok", "memes": count })))
}
