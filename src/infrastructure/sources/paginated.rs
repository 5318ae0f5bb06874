// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 静态分页爬取驱动
//!
//! 在 列表页 → 详情页 → 下一页 的页面图上做广度优先遍历。站点差异
//! （选择器、JSON片段解包、翻页链接）全部收敛进 [`SiteRules`]，驱动
//! 本身只负责队列、并发派发、计数上限与失败跳过。

use crate::domain::models::Meme;
use crate::engines::fetcher::{FetchError, FetchedPage, RateLimitedFetcher};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};
use url::Url;

/// 站点规则：一个静态来源对页面结构的全部认知
pub trait SiteRules: Send + Sync {
    /// 从列表页（或JSON片段页）提取详情页链接
    fn detail_links(&self, page: &FetchedPage) -> Vec<Url>;

    /// 从列表页提取下一页链接
    fn next_page(&self, _page: &FetchedPage) -> Option<Url> {
        None
    }

    /// 从详情页提取一条记录；不合格的页面返回None（正常过滤，非错误）
    fn extract(&self, page: &FetchedPage) -> Option<Meme>;
}

/// 静态分页爬取器
///
/// 全局计数上限 `max_items` 一旦到达，队列剩余的列表页与翻页动作
/// 全部变成空操作，爬取平滑收尾而不是报错。单个详情页的抓取或解析
/// 失败只记日志并跳过，绝不中断整个爬取。
pub struct PaginatedCrawler<R: SiteRules> {
    fetcher: Arc<RateLimitedFetcher>,
    rules: R,
    max_items: usize,
    max_pages: usize,
}

impl<R: SiteRules> PaginatedCrawler<R> {
    pub fn new(fetcher: Arc<RateLimitedFetcher>, rules: R, max_items: usize, max_pages: usize) -> Self {
        Self {
            fetcher,
            rules,
            max_items: max_items.max(1),
            max_pages: max_pages.max(1),
        }
    }

    /// 从种子列表页开始遍历，返回提取到的记录
    pub async fn run(&self, seeds: Vec<Url>) -> Vec<Meme> {
        let mut memes: Vec<Meme> = Vec::new();
        let mut queue: VecDeque<(Url, usize)> = seeds.into_iter().map(|u| (u, 0)).collect();

        while let Some((list_url, depth)) = queue.pop_front() {
            if memes.len() >= self.max_items {
                break;
            }

            let list_page = match self.fetcher.fetch(&list_url).await {
                Ok(page) => page,
                Err(FetchError::OutOfScope(_)) => continue,
                Err(e) => {
                    warn!("列表页抓取失败，跳过 {}: {}", list_url, e);
                    continue;
                }
            };

            // 并发抓取详情页，并发上限由fetcher自身约束
            let mut inflight = JoinSet::new();
            for link in self.rules.detail_links(&list_page) {
                let fetcher = self.fetcher.clone();
                inflight.spawn(async move { fetcher.fetch(&link).await });
            }

            while let Some(joined) = inflight.join_next().await {
                if memes.len() >= self.max_items {
                    // 上限已到，余下回调退化为空操作
                    continue;
                }
                match joined {
                    Ok(Ok(detail)) => {
                        if let Some(meme) = self.rules.extract(&detail) {
                            if meme.is_valid() {
                                debug!("[SAVE] {}", meme.title);
                                memes.push(meme);
                            }
                        }
                    }
                    Ok(Err(FetchError::OutOfScope(_))) => {}
                    Ok(Err(e)) => warn!("详情页抓取失败，跳过: {}", e),
                    Err(e) => warn!("详情页任务异常，跳过: {}", e),
                }
            }

            if memes.len() >= self.max_items {
                break;
            }

            if depth + 1 < self.max_pages {
                if let Some(next) = self.rules.next_page(&list_page) {
                    debug!("[PAGE] 进入下一页: {}", next);
                    queue.push_back((next, depth + 1));
                }
            }
        }

        memes.truncate(self.max_items);
        memes
    }
}
