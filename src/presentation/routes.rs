// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 路由装配

use crate::domain::repositories::MemeRepository;
use crate::presentation::handlers;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// 接口层共享状态
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn MemeRepository>,
}

/// 构建只读查询接口的路由
pub fn build_router(repository: Arc<dyn MemeRepository>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/search", get(handlers::search))
        .route("/api/random", get(handlers::random))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState { repository })
}
