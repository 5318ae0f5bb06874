// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::{spawn_server, HitLog};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use memrs::engines::fetcher::{FetchError, RateLimitPolicy, RateLimitedFetcher};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

fn local_policy() -> RateLimitPolicy {
    RateLimitPolicy::for_host("127.0.0.1")
        .with_delays(Duration::ZERO, Duration::ZERO)
        .with_timeout(Duration::from_secs(5))
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let router = Router::new().route(
        "/missing",
        get(|| async { (StatusCode::NOT_FOUND, "gone") }),
    );
    let addr = spawn_server(router).await;

    let fetcher = RateLimitedFetcher::new(local_policy()).unwrap();
    let url = Url::parse(&format!("http://{addr}/missing")).unwrap();
    match fetcher.fetch(&url).await {
        Err(FetchError::Status { status: 404, .. }) => {}
        other => panic!("expected 404 status error, got {:?}", other.map(|p| p.url)),
    }
}

#[tokio::test]
async fn test_configured_cookie_is_sent_with_every_request() {
    async fn echo_cookie(headers: HeaderMap) -> Html<String> {
        let cookie = headers
            .get("cookie")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        Html(cookie)
    }
    let router = Router::new().route("/page", get(echo_cookie));
    let addr = spawn_server(router).await;

    let fetcher = RateLimitedFetcher::new(local_policy().with_cookie("over18=1")).unwrap();
    let url = Url::parse(&format!("http://{addr}/page")).unwrap();
    let page = fetcher.fetch(&url).await.unwrap();
    assert!(page.body.contains("over18=1"));
}

#[tokio::test]
async fn test_off_list_host_never_reaches_the_network() {
    let hits: HitLog = Arc::new(Mutex::new(Vec::new()));
    let router = Router::new()
        .route(
            "/page",
            get(|State(hits): State<HitLog>| async move {
                hits.lock().unwrap().push("/page".to_string());
                Html("hello".to_string())
            }),
        )
        .with_state(Arc::clone(&hits));
    let addr = spawn_server(router).await;

    let policy = RateLimitPolicy::for_host("www.example.com")
        .with_delays(Duration::ZERO, Duration::ZERO);
    let fetcher = RateLimitedFetcher::new(policy).unwrap();
    let url = Url::parse(&format!("http://{addr}/page")).unwrap();

    match fetcher.fetch(&url).await {
        Err(FetchError::OutOfScope(_)) => {}
        other => panic!("expected OutOfScope, got {:?}", other.map(|p| p.url)),
    }
    assert!(hits.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let router = Router::new().route(
        "/slow",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Html("late".to_string())
        }),
    );
    let addr = spawn_server(router).await;

    let policy = local_policy().with_timeout(Duration::from_millis(300));
    let fetcher = RateLimitedFetcher::new(policy).unwrap();
    let url = Url::parse(&format!("http://{addr}/slow")).unwrap();
    match fetcher.fetch(&url).await {
        Err(FetchError::Timeout(_)) => {}
        other => panic!("expected Timeout, got {:?}", other.map(|p| p.url)),
    }
}
