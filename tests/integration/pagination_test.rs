// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 分页采集的端到端路径：合成的三页看板跑在本机服务上

use crate::{spawn_server, HitLog};
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::Router;
use memrs::domain::sources::MemeSource;
use memrs::engines::fetcher::{RateLimitPolicy, RateLimitedFetcher};
use memrs::infrastructure::sources::ptt::PttSource;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

fn index_page(articles: &[u32], prev: Option<&str>) -> String {
    let mut rows = String::new();
    for n in articles {
        rows.push_str(&format!(
            r#"<div class="r-ent"><div class="title"><a href="/bbs/Test/M.{n}.A.html">文章{n}</a></div></div>"#
        ));
    }
    let paging = match prev {
        Some(href) => format!(
            r#"<div class="btn-group-paging"><a class="btn wide" href="{href}">‹ 上頁</a></div>"#
        ),
        None => String::new(),
    };
    format!("<html><body>{rows}{paging}</body></html>")
}

fn article_page(n: u32) -> String {
    format!(
        r#"<html><body><div id="main-content">
            <div class="article-metaline"><span class="article-meta-value">someone</span></div>
            <div class="article-metaline-right"><span class="article-meta-value">Test</span></div>
            <div class="article-metaline"><span class="article-meta-value">[測試] 第{n}篇文章</span></div>
            這是第{n}篇文章的正文內容，為了通過長度門檻特地寫得足夠長。
        </div></body></html>"#
    )
}

async fn board(State(hits): State<HitLog>, uri: Uri) -> Response {
    let path = uri.path().to_string();
    hits.lock().unwrap().push(path.clone());
    let body = match path.as_str() {
        "/bbs/Test/index.html" => index_page(&[1, 2], Some("/bbs/Test/index2.html")),
        "/bbs/Test/index2.html" => index_page(&[3, 4], Some("/bbs/Test/index3.html")),
        "/bbs/Test/index3.html" => index_page(&[], None),
        "/bbs/Test/M.1.A.html" => article_page(1),
        "/bbs/Test/M.2.A.html" => article_page(2),
        "/bbs/Test/M.3.A.html" => article_page(3),
        "/bbs/Test/M.4.A.html" => article_page(4),
        _ => return StatusCode::NOT_FOUND.into_response(),
    };
    Html(body).into_response()
}

fn source(addr: std::net::SocketAddr, max_posts: usize, max_pages: usize) -> PttSource {
    let policy = RateLimitPolicy::for_host("127.0.0.1")
        .with_parallelism(2)
        .with_delays(Duration::ZERO, Duration::ZERO)
        .with_timeout(Duration::from_secs(5));
    let fetcher = Arc::new(RateLimitedFetcher::new(policy).unwrap());
    let board_index = Url::parse(&format!("http://{addr}/bbs/Test/index.html")).unwrap();
    PttSource::new(fetcher, board_index, max_posts, max_pages, 10)
}

fn hit_router(hits: &HitLog) -> Router {
    Router::new()
        .fallback(board)
        .with_state(Arc::clone(hits))
}

#[tokio::test]
async fn test_post_cap_stops_pagination_early() {
    let hits: HitLog = Arc::new(Mutex::new(Vec::new()));
    let addr = spawn_server(hit_router(&hits)).await;

    let memes = source(addr, 3, 10).scrape().await.unwrap();
    assert_eq!(memes.len(), 3);

    // 上限在第二页中途到达，第三页不再被请求
    let hits = hits.lock().unwrap();
    assert!(hits.iter().any(|p| p == "/bbs/Test/index2.html"));
    assert!(!hits.iter().any(|p| p == "/bbs/Test/index3.html"));
}

#[tokio::test]
async fn test_full_walk_collects_everything() {
    let hits: HitLog = Arc::new(Mutex::new(Vec::new()));
    let addr = spawn_server(hit_router(&hits)).await;

    let memes = source(addr, 100, 10).scrape().await.unwrap();
    assert_eq!(memes.len(), 4);

    let titles: Vec<&str> = memes.iter().map(|m| m.title.as_str()).collect();
    for n in 1..=4 {
        let expected = format!("[測試] 第{n}篇文章");
        assert!(titles.contains(&expected.as_str()), "missing {expected}");
    }
    // 每篇文章的来源定位指向文章页本身
    assert!(memes.iter().all(|m| m.source_url.contains("/bbs/Test/M.")));
}

#[tokio::test]
async fn test_page_depth_limit_is_honored() {
    let hits: HitLog = Arc::new(Mutex::new(Vec::new()));
    let addr = spawn_server(hit_router(&hits)).await;

    let memes = source(addr, 100, 1).scrape().await.unwrap();
    // 只允许一页索引，后两篇文章不会被看到
    assert_eq!(memes.len(), 2);
    let hits = hits.lock().unwrap();
    assert!(!hits.iter().any(|p| p == "/bbs/Test/index2.html"));
}
