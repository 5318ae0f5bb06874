// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! PTT看板来源
//!
//! 看板是典型的论坛式分页：索引页罗列文章链接，`上頁` 按钮向更旧的
//! 索引翻页。文章页以 `#main-content` 为内容容器，需剔除推文与
//! 元数据行，并在签名档分隔符处截断。看板有年龄确认，请求固定携带
//! over18 Cookie。

use crate::domain::models::Meme;
use crate::domain::sources::{MemeSource, SourceError};
use crate::engines::fetcher::{FetchedPage, RateLimitedFetcher};
use crate::infrastructure::sources::paginated::{PaginatedCrawler, SiteRules};
use crate::utils::html::text_without;
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::sync::Arc;
use tracing::info;
use url::Url;

/// 签名档起始分隔符，其后的内容一律丢弃
const SIGNATURE_DELIMITER: &str = "--";

/// 内容容器里要剔除的非内容子结构
const EXCLUDED_CLASSES: &[&str] = &["push", "article-metaline", "article-metaline-right"];

pub struct PttRules {
    /// 低于该字节数的正文视为噪音丢弃
    min_content_len: usize,
}

impl PttRules {
    pub fn new(min_content_len: usize) -> Self {
        Self { min_content_len }
    }
}

impl SiteRules for PttRules {
    fn detail_links(&self, page: &FetchedPage) -> Vec<Url> {
        let doc = Html::parse_document(&page.body);
        let title_link =
            Selector::parse("div.r-ent > div.title > a[href]").expect("list selector");
        doc.select(&title_link)
            .filter_map(|a| a.value().attr("href"))
            .filter_map(|href| page.resolve(href))
            .collect()
    }

    fn next_page(&self, page: &FetchedPage) -> Option<Url> {
        let doc = Html::parse_document(&page.body);
        let paging = Selector::parse("div.btn-group-paging > a.btn.wide").expect("paging selector");
        doc.select(&paging)
            .find(|a| a.text().collect::<String>().contains("上頁"))
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| page.resolve(href))
    }

    fn extract(&self, page: &FetchedPage) -> Option<Meme> {
        // 只有文章页走提取，索引等其他页面直接略过
        if !page.url.path().contains("/M.") || !page.is_html() {
            return None;
        }

        let doc = Html::parse_document(&page.body);
        let title_sel = Selector::parse(".article-metaline:nth-child(3) .article-meta-value")
            .expect("title selector");
        let title = doc
            .select(&title_sel)
            .next()
            .map(|t| t.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        let main_sel = Selector::parse("#main-content").expect("content selector");
        let main = doc.select(&main_sel).next()?;
        let mut content = text_without(main, EXCLUDED_CLASSES);
        if let Some(cut) = content.find(SIGNATURE_DELIMITER) {
            content.truncate(cut);
        }
        let content = content.trim();

        if title.is_empty() || content.is_empty() || content.len() < self.min_content_len {
            return None;
        }

        let tags = title.split_whitespace().collect::<Vec<_>>().join(", ");
        Some(Meme::new(title, content, tags, page.url.clone()))
    }
}

/// PTT看板来源
pub struct PttSource {
    fetcher: Arc<RateLimitedFetcher>,
    board_index: Url,
    max_posts: usize,
    max_pages: usize,
    min_content_len: usize,
}

impl PttSource {
    pub fn new(
        fetcher: Arc<RateLimitedFetcher>,
        board_index: Url,
        max_posts: usize,
        max_pages: usize,
        min_content_len: usize,
    ) -> Self {
        Self {
            fetcher,
            board_index,
            max_posts,
            max_pages,
            min_content_len,
        }
    }
}

#[async_trait]
impl MemeSource for PttSource {
    fn name(&self) -> &'static str {
        "ptt"
    }

    async fn scrape(&self) -> Result<Vec<Meme>, SourceError> {
        info!("[START] 开始爬取看板索引: {}", self.board_index);
        let crawler = PaginatedCrawler::new(
            self.fetcher.clone(),
            PttRules::new(self.min_content_len),
            self.max_posts,
            self.max_pages,
        );
        let memes = crawler.run(vec![self.board_index.clone()]).await;
        info!("看板采集完成: {} 条", memes.len());
        Ok(memes)
    }
}
