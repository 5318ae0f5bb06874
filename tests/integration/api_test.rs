// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 查询接口的整链路测试：内存SQLite +（不经网络的）单次请求派发

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use memrs::domain::models::Meme;
use memrs::domain::repositories::MemeRepository;
use memrs::infrastructure::database::{create_pool, ensure_schema, MemeRepositoryImpl};
use memrs::presentation::build_router;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

async fn seeded_router() -> Router {
    let pool = create_pool("sqlite::memory:", 1).await.unwrap();
    ensure_schema(&pool).await.unwrap();
    let repo = MemeRepositoryImpl::new(pool);
    repo.insert(&Meme::new(
        "author",
        "https://cdn.example.com/funny-cat.gif",
        "funny cat GIF",
        "https://example.com/g/1",
    ))
    .await
    .unwrap();
    repo.insert(&Meme::new(
        "author",
        "關於 cat 的文字複製文",
        "funny cat",
        "https://example.com/t/1",
    ))
    .await
    .unwrap();
    build_router(Arc::new(repo))
}

async fn empty_router() -> Router {
    let pool = create_pool("sqlite::memory:", 1).await.unwrap();
    ensure_schema(&pool).await.unwrap();
    build_router(Arc::new(MemeRepositoryImpl::new(pool)))
}

async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn test_search_requires_a_query() {
    let (status, body) = get_json(seeded_router().await, "/api/search").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("q"));

    let (status, _) = get_json(seeded_router().await, "/api/search?q=%20%20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_modes_partition_results() {
    let (status, body) = get_json(seeded_router().await, "/api/search?q=cat").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    let (_, images) = get_json(seeded_router().await, "/api/search?q=cat&mode=image").await;
    assert_eq!(images["count"], 1);
    assert!(images["results"][0]["url"]
        .as_str()
        .unwrap()
        .starts_with("http"));

    let (_, texts) = get_json(seeded_router().await, "/api/search?q=cat&mode=text").await;
    assert_eq!(texts["count"], 1);
    assert!(!texts["results"][0]["url"]
        .as_str()
        .unwrap()
        .starts_with("http"));
}

#[tokio::test]
async fn test_random_is_404_on_empty_database() {
    let (status, body) = get_json(empty_router().await, "/api/random").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (status, body) = get_json(seeded_router().await, "/api/random?mode=text").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], "關於 cat 的文字複製文");
}

#[tokio::test]
async fn test_health_reports_meme_count() {
    let (status, body) = get_json(seeded_router().await, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["memes"], 2);
}
