// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! Plurk 行动版时间轴采集
//!
//! 行动版页面（`/m/u/<user>`）结构远比桌面版简单：每条噗文是一个
//! `.plurk` 块，正文在 `.plurk-content` 里。年龄确认门用一段脚本直接
//! 点掉，比等待选择器更能容忍门不存在的情况。

use crate::domain::models::Meme;
use crate::domain::sources::{MemeSource, SourceError};
use crate::engines::browser::ScrollSurface;
use crate::infrastructure::sources::scroll::{OverlayAction, ScrollCrawler, ScrollPlan};
use crate::utils::html::text_with_breaks;
use crate::utils::normalize::PLURK;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{info, warn};

/// 噗文正文选择器
static PLURK_CONTENT: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".plurk .plurk-content").expect("plurk content selector")
});

/// 年龄确认门的消解脚本：找到确认链接并点击，门不存在时静默无事发生
const AGE_GATE_SCRIPT: &str = r#"
    (function() {
        var links = document.querySelectorAll('a, button');
        for (var i = 0; i < links.length; i++) {
            var t = (links[i].textContent || '').trim();
            if (t === '是' || t === 'Yes' || t.indexOf('已滿18歲') !== -1) {
                links[i].click();
                return;
            }
        }
    })();
"#;

/// 从一份整页快照提取某账号的全部噗文
pub fn parse_plurks(author: &str, source_url: &str, html: &str) -> Vec<Meme> {
    let document = Html::parse_document(html);
    document
        .select(&PLURK_CONTENT)
        .filter_map(|block| {
            let raw = text_with_breaks(block);
            let content = PLURK.clean(&raw, None)?;
            Some(Meme::new(author, content, "Plurk", source_url))
        })
        .collect()
}

/// Plurk 来源：按账号列表逐个滚动采集
pub struct PlurkSource<S: ScrollSurface> {
    surface: S,
    users: Vec<String>,
    plan: ScrollPlan,
}

impl<S: ScrollSurface> PlurkSource<S> {
    pub fn new(surface: S, users: Vec<String>, plan: ScrollPlan) -> Self {
        Self { surface, users, plan }
    }
}

#[async_trait]
impl<S: ScrollSurface> MemeSource for PlurkSource<S> {
    fn name(&self) -> &'static str {
        "plurk"
    }

    async fn scrape(&self) -> Result<Vec<Meme>, SourceError> {
        let crawler = ScrollCrawler::new(&self.surface, self.plan.clone());
        let mut memes = Vec::new();

        for user in &self.users {
            let url = format!("https://www.plurk.com/m/u/{user}");
            info!("采集 Plurk 账号 {} ...", user);
            match crawler
                .collect(&url, Some(OverlayAction::Script(AGE_GATE_SCRIPT)), |html| {
                    parse_plurks(user, &url, html)
                })
                .await
            {
                Ok(batch) => {
                    info!("{} 采集到 {} 条", user, batch.len());
                    memes.extend(batch);
                }
                Err(e) => {
                    warn!("{} 采集失败（跳过）: {}", user, e);
                }
            }

            let pause = Duration::from_millis(rand::random_range(3000..6000));
            tokio::time::sleep(pause).await;
        }

        Ok(memes)
    }
}
