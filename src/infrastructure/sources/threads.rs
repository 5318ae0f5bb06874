// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! Threads 个人页采集
//!
//! 逐个账号滚动采集贴文文本，清洗掉界面外壳（追踪头部、互动计数尾部）
//! 后产出纯文本记录。贴文容器靠 `data-pressable-container` 属性定位，
//! 这是该站相对稳定的结构锚点。

use crate::domain::models::Meme;
use crate::domain::sources::{MemeSource, SourceError};
use crate::engines::browser::ScrollSurface;
use crate::infrastructure::sources::scroll::{OverlayAction, ScrollCrawler, ScrollPlan};
use crate::utils::html::text_with_breaks;
use crate::utils::normalize::THREADS;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{info, warn};

/// 贴文容器选择器
static POST_CONTAINER: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div[data-pressable-container='true']").expect("post container selector")
});

/// 登录弹窗的关闭按钮
const DIALOG_CLOSE: &str = "div[role=\"dialog\"] div[role=\"button\"]";

/// 从一份整页快照提取某账号的全部候选贴文
pub fn parse_threads(author: &str, source_url: &str, html: &str) -> Vec<Meme> {
    let document = Html::parse_document(html);
    document
        .select(&POST_CONTAINER)
        .filter_map(|container| {
            let raw = text_with_breaks(container);
            let content = THREADS.clean(&raw, Some(author))?;
            Some(Meme::new(author, content, "Threads", source_url))
        })
        .collect()
}

/// Threads 来源：按账号列表逐个滚动采集
pub struct ThreadsSource<S: ScrollSurface> {
    surface: S,
    users: Vec<String>,
    plan: ScrollPlan,
}

impl<S: ScrollSurface> ThreadsSource<S> {
    pub fn new(surface: S, users: Vec<String>, plan: ScrollPlan) -> Self {
        Self { surface, users, plan }
    }
}

#[async_trait]
impl<S: ScrollSurface> MemeSource for ThreadsSource<S> {
    fn name(&self) -> &'static str {
        "threads"
    }

    async fn scrape(&self) -> Result<Vec<Meme>, SourceError> {
        let crawler = ScrollCrawler::new(&self.surface, self.plan.clone());
        let mut memes = Vec::new();

        for user in &self.users {
            // 先落到空白页，避免上一个账号的单页应用状态串页
            if let Err(e) = self.surface.navigate("about:blank").await {
                warn!("账号间页面重置失败: {}", e);
            }
            tokio::time::sleep(Duration::from_secs(1)).await;

            let url = format!("https://www.threads.net/@{user}");
            info!("采集 Threads 账号 @{} ...", user);
            match crawler
                .collect(&url, Some(OverlayAction::Click(DIALOG_CLOSE)), |html| {
                    parse_threads(user, &url, html)
                })
                .await
            {
                Ok(batch) => {
                    info!("@{} 采集到 {} 条", user, batch.len());
                    memes.extend(batch);
                }
                Err(e) => {
                    // 单个账号失败不拖垮其余账号
                    warn!("@{} 采集失败（跳过）: {}", user, e);
                }
            }

            // 账号之间随机间隔，贴近人工浏览节奏
            let pause = Duration::from_millis(rand::random_range(3000..6000));
            tokio::time::sleep(pause).await;
        }

        Ok(memes)
    }
}
