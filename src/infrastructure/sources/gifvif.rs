// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! GIF图库来源
//!
//! 图库的列表以分页JSON接口提供：每页是一个HTML片段数组，片段里
//! 才是详情页链接，功能上等价于列表页、只是多一步JSON解包。详情页
//! 以 `img.media-show` 为结构锚点，媒体URL即记录内容。

use crate::domain::models::Meme;
use crate::domain::sources::{MemeSource, SourceError};
use crate::engines::fetcher::{FetchedPage, RateLimitedFetcher};
use crate::infrastructure::sources::paginated::{PaginatedCrawler, SiteRules};
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// 每页偏移步长，由站点的loadMore接口决定
const PAGE_OFFSET_STEP: u32 = 8;

pub struct GifVifRules;

impl GifVifRules {
    /// 片段/列表里指向详情页的链接：包含 /gifs/ 且不是下载链接
    fn is_gif_link(href: &str) -> bool {
        href.contains("/gifs/") && !href.contains("/download/")
    }

    fn links_from_fragment(page: &FetchedPage, fragment: &str, out: &mut Vec<Url>) {
        let doc = Html::parse_fragment(fragment);
        let anchor = Selector::parse("a[href]").expect("anchor selector");
        for a in doc.select(&anchor) {
            if let Some(href) = a.value().attr("href") {
                if Self::is_gif_link(href) {
                    if let Some(url) = page.resolve(href) {
                        out.push(url);
                    }
                }
            }
        }
    }
}

impl SiteRules for GifVifRules {
    fn detail_links(&self, page: &FetchedPage) -> Vec<Url> {
        let mut links = Vec::new();
        if page.is_json() {
            // 分页接口返回HTML片段数组
            match serde_json::from_str::<Vec<String>>(&page.body) {
                Ok(fragments) => {
                    for fragment in &fragments {
                        Self::links_from_fragment(page, fragment, &mut links);
                    }
                }
                Err(e) => debug!("片段页JSON解析失败，跳过 {}: {}", page.url, e),
            }
        } else {
            let doc = Html::parse_document(&page.body);
            let item = Selector::parse("div.gif-item a[href]").expect("gif item selector");
            for a in doc.select(&item) {
                if let Some(href) = a.value().attr("href") {
                    if Self::is_gif_link(href) {
                        if let Some(url) = page.resolve(href) {
                            links.push(url);
                        }
                    }
                }
            }
        }
        links
    }

    fn extract(&self, page: &FetchedPage) -> Option<Meme> {
        let doc = Html::parse_document(&page.body);
        let media = Selector::parse("img.media-show").expect("media selector");
        let img = doc.select(&media).next()?;
        let src = img.value().attr("src")?;
        let media_url = page.resolve(src)?;

        let mut title = img.value().attr("alt").unwrap_or_default().trim().to_string();
        if title.is_empty() {
            let title_sel = Selector::parse("title").expect("title selector");
            title = doc
                .select(&title_sel)
                .next()
                .map(|t| t.text().collect::<String>().trim().to_string())
                .unwrap_or_default();
        }
        if title.is_empty() {
            return None;
        }

        let tags = title.split_whitespace().collect::<Vec<_>>().join(", ");
        Some(Meme::new(title, media_url, tags, page.url.clone()))
    }
}

/// GIF图库来源
pub struct GifVifSource {
    fetcher: Arc<RateLimitedFetcher>,
    base_url: Url,
    pages: u32,
    max_items: usize,
}

impl GifVifSource {
    pub fn new(
        fetcher: Arc<RateLimitedFetcher>,
        base_url: Url,
        pages: u32,
        max_items: usize,
    ) -> Self {
        Self {
            fetcher,
            base_url,
            pages,
            max_items,
        }
    }

    fn seeds(&self) -> Vec<Url> {
        (0..self.pages)
            .filter_map(|page| {
                self.base_url
                    .join(&format!("loadMore.php?offset={}", page * PAGE_OFFSET_STEP))
                    .ok()
            })
            .collect()
    }
}

#[async_trait]
impl MemeSource for GifVifSource {
    fn name(&self) -> &'static str {
        "gif-vif"
    }

    async fn scrape(&self) -> Result<Vec<Meme>, SourceError> {
        let crawler = PaginatedCrawler::new(
            self.fetcher.clone(),
            GifVifRules,
            self.max_items,
            1, // 分页由种子偏移展开，不走next_page
        );
        let memes = crawler.run(self.seeds()).await;
        info!("GIF图库采集完成: {} 条", memes.len());
        Ok(memes)
    }
}
