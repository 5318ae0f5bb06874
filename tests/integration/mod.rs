// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 集成测试入口：用本机临时HTTP服务还原真实抓取路径

mod api_test;
mod fetcher_test;
mod pagination_test;

use axum::Router;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

/// 请求路径记录，用于断言哪些页面真的被抓取过
pub type HitLog = Arc<Mutex<Vec<String>>>;

/// 在随机端口上跑一个一次性服务，返回监听地址
pub async fn spawn_server(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("test listener addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    addr
}
