// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 动态滚动爬取驱动
//!
//! 针对随视口滚动渐进渲染的目标：单次快照会漏掉被虚拟化卸载的早期
//! 条目，所以每轮滚动后都抓取整页标记、解析并经会话去重后累计。
//! 「震动滚动」（滚到底、回拉、再滚到底）是刻意的二次触底，有些信息
//! 流只在边界被再次跨越时才加载更多内容。

use crate::domain::models::Meme;
use crate::domain::session::CrawlSession;
use crate::engines::browser::{BrowserError, ScrollSurface};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// 弹窗/年龄门的尽力而为消解动作，失败被吞掉（弹窗可能根本不存在）
pub enum OverlayAction {
    /// 点击匹配选择器的元素
    Click(&'static str),
    /// 执行一段消解脚本
    Script(&'static str),
}

/// 消解动作的时间上限
const DISMISS_TIMEOUT: Duration = Duration::from_secs(2);

/// 首屏根元素的可见等待上限
const ROOT_VISIBLE_TIMEOUT: Duration = Duration::from_secs(10);

/// 滚动到底后等第一批内容挂载的短暂停顿
const BOTTOM_PAUSE: Duration = Duration::from_millis(1000);

/// 回拉后的短暂停顿
const JIGGLE_PAUSE: Duration = Duration::from_millis(500);

/// 一个目标的滚动计划
#[derive(Debug, Clone)]
pub struct ScrollPlan {
    /// 滚动轮数
    pub rounds: u32,
    /// 震动回拉的像素数
    pub jiggle_px: u32,
    /// 单轮滚动-抓取的超时
    pub round_timeout: Duration,
    /// 每轮末尾等异步内容挂载的沉降时长
    pub settle: Duration,
    /// 整个目标的总时限，到期返回已累计的部分结果
    pub target_timeout: Duration,
}

impl Default for ScrollPlan {
    fn default() -> Self {
        Self {
            rounds: 10,
            jiggle_px: 300,
            round_timeout: Duration::from_secs(15),
            settle: Duration::from_secs(3),
            target_timeout: Duration::from_secs(300),
        }
    }
}

/// 动态滚动爬取器
///
/// 轮次严格串行：第 i+1 轮在第 i 轮抓取完成或超时前绝不开始，
/// 因为每轮的去重依赖之前所有轮次累计的键集合。
pub struct ScrollCrawler<'a, S: ScrollSurface> {
    surface: &'a S,
    plan: ScrollPlan,
}

impl<'a, S: ScrollSurface> ScrollCrawler<'a, S> {
    pub fn new(surface: &'a S, plan: ScrollPlan) -> Self {
        Self { surface, plan }
    }

    /// 对单个目标执行完整的滚动采集
    ///
    /// # 参数
    ///
    /// * `url` - 目标页面
    /// * `overlay` - 可选的弹窗消解动作
    /// * `parse` - 从整页标记提取候选记录的来源专属解析器
    ///
    /// # 返回值
    ///
    /// * `Ok(Vec<Meme>)` - 会话累计的去重记录（超时时为部分结果）
    /// * `Err(BrowserError)` - 导航或首屏等待失败，目标整体中止
    pub async fn collect<F>(
        &self,
        url: &str,
        overlay: Option<OverlayAction>,
        parse: F,
    ) -> Result<Vec<Meme>, BrowserError>
    where
        F: Fn(&str) -> Vec<Meme>,
    {
        let deadline = Instant::now() + self.plan.target_timeout;

        // 导航失败或首屏等不到都中止本目标，由调用方跳到下一个目标。
        // 两步都收在目标总时限之内，卡死的导航不能拖过时限。
        match tokio::time::timeout_at(deadline, self.surface.navigate(url)).await {
            Ok(result) => result?,
            Err(_) => return Err(BrowserError::Timeout(format!("navigating to {url}"))),
        }
        let visible_budget =
            ROOT_VISIBLE_TIMEOUT.min(deadline.saturating_duration_since(Instant::now()));
        self.surface.wait_visible("body", visible_budget).await?;

        if let Some(action) = overlay {
            let attempt = async {
                match action {
                    OverlayAction::Click(selector) => self.surface.click(selector).await,
                    OverlayAction::Script(script) => self.surface.evaluate(script).await,
                }
            };
            match tokio::time::timeout(DISMISS_TIMEOUT, attempt).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => debug!("弹窗消解未生效（可能不存在弹窗）: {}", e),
                Err(_) => debug!("弹窗消解超时（可能不存在弹窗）"),
            }
        }

        let mut session = CrawlSession::new();
        for round in 1..=self.plan.rounds {
            if Instant::now() >= deadline {
                warn!("目标总时限已到，保留已累计的 {} 条", session.len());
                break;
            }
            debug!("... 滚动与解析 {}/{}", round, self.plan.rounds);

            let html = match tokio::time::timeout(self.plan.round_timeout, self.scroll_round())
                .await
            {
                Ok(Ok(html)) => html,
                Ok(Err(e)) => {
                    warn!("滚动操作失败（跳过此轮）: {}", e);
                    continue;
                }
                Err(_) => {
                    warn!("滚动操作超时（跳过此轮）");
                    continue;
                }
            };

            let mut fresh = 0;
            for meme in parse(&html) {
                if session.admit(meme) {
                    fresh += 1;
                }
            }
            debug!("    -> 本轮新增 {} 条（累计 {}）", fresh, session.len());
        }

        Ok(session.into_memes())
    }

    /// 一轮：滚到底、回拉、再滚到底、沉降、抓取整页标记
    async fn scroll_round(&self) -> Result<String, BrowserError> {
        self.surface
            .evaluate("window.scrollTo(0, document.body.scrollHeight);")
            .await?;
        tokio::time::sleep(BOTTOM_PAUSE).await;

        self.surface
            .evaluate(&format!("window.scrollBy(0, -{});", self.plan.jiggle_px))
            .await?;
        tokio::time::sleep(JIGGLE_PAUSE).await;

        self.surface
            .evaluate("window.scrollTo(0, document.body.scrollHeight);")
            .await?;
        tokio::time::sleep(self.plan.settle).await;

        self.surface.capture_html().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// 回放预置轮次快照的假滚动表面
    struct FakeSurface {
        snapshots: Mutex<Vec<Result<String, ()>>>,
        slow_round: Option<u32>,
        cursor: Mutex<u32>,
    }

    impl FakeSurface {
        fn new(snapshots: Vec<Result<String, ()>>) -> Self {
            Self {
                snapshots: Mutex::new(snapshots),
                slow_round: None,
                cursor: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl ScrollSurface for FakeSurface {
        async fn navigate(&self, _url: &str) -> Result<(), BrowserError> {
            Ok(())
        }

        async fn wait_visible(
            &self,
            _selector: &str,
            _timeout: Duration,
        ) -> Result<(), BrowserError> {
            Ok(())
        }

        async fn click(&self, selector: &str) -> Result<(), BrowserError> {
            Err(BrowserError::ElementNotFound(selector.to_string()))
        }

        async fn evaluate(&self, _script: &str) -> Result<(), BrowserError> {
            Ok(())
        }

        async fn capture_html(&self) -> Result<String, BrowserError> {
            let round = {
                let mut cursor = self.cursor.lock().unwrap();
                *cursor += 1;
                *cursor
            };
            if Some(round) == self.slow_round {
                // 比单轮超时还久，驱动必须跳过此轮而不是卡死
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            let mut snapshots = self.snapshots.lock().unwrap();
            if snapshots.is_empty() {
                return Ok(String::new());
            }
            snapshots
                .remove(0)
                .map_err(|_| BrowserError::Cdp("capture failed".to_string()))
        }
    }

    fn plan(rounds: u32) -> ScrollPlan {
        ScrollPlan {
            rounds,
            ..ScrollPlan::default()
        }
    }

    /// 把快照按行拆成记录，行内容即规范键
    fn parse_lines(html: &str) -> Vec<Meme> {
        html.lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| Meme::new("author", l.trim(), "test", "https://example.com/t"))
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_superset_snapshots_accumulate_without_duplicates() {
        // 第二轮快照是第一轮的超集外加两条新内容
        let surface = FakeSurface::new(vec![
            Ok("a\nb\nc".to_string()),
            Ok("a\nb\nc\nd\ne".to_string()),
        ]);
        let crawler = ScrollCrawler::new(&surface, plan(2));
        let memes = crawler
            .collect("https://example.com/@user", None, parse_lines)
            .await
            .unwrap();
        let keys: Vec<_> = memes.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "c", "d", "e"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_identical_snapshot_adds_nothing() {
        let surface = FakeSurface::new(vec![
            Ok("a\nb".to_string()),
            Ok("a\nb".to_string()),
        ]);
        let crawler = ScrollCrawler::new(&surface, plan(2));
        let memes = crawler
            .collect("https://example.com/@user", None, parse_lines)
            .await
            .unwrap();
        assert_eq!(memes.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_round_is_skipped_not_fatal() {
        let surface = FakeSurface::new(vec![
            Ok("a".to_string()),
            Err(()),
            Ok("a\nb".to_string()),
        ]);
        let crawler = ScrollCrawler::new(&surface, plan(3));
        let memes = crawler
            .collect("https://example.com/@user", None, parse_lines)
            .await
            .unwrap();
        assert_eq!(memes.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stuck_round_times_out_and_loop_continues() {
        let mut surface = FakeSurface::new(vec![
            Ok("a".to_string()),
            Ok("a\nb".to_string()),
        ]);
        surface.slow_round = Some(2);
        let crawler = ScrollCrawler::new(&surface, plan(3));
        let memes = crawler
            .collect("https://example.com/@user", None, parse_lines)
            .await
            .unwrap();
        // 第二轮卡死被跳过，第三轮拿到后续快照
        assert_eq!(memes.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlay_failure_is_swallowed() {
        let surface = FakeSurface::new(vec![Ok("a\nb".to_string())]);
        let crawler = ScrollCrawler::new(&surface, plan(1));
        let memes = crawler
            .collect(
                "https://example.com/@user",
                Some(OverlayAction::Click("div[role=dialog]")),
                parse_lines,
            )
            .await
            .unwrap();
        assert_eq!(memes.len(), 2);
    }

    /// 导航永不返回的滚动表面
    struct StalledSurface;

    #[async_trait]
    impl ScrollSurface for StalledSurface {
        async fn navigate(&self, _url: &str) -> Result<(), BrowserError> {
            std::future::pending().await
        }

        async fn wait_visible(
            &self,
            _selector: &str,
            _timeout: Duration,
        ) -> Result<(), BrowserError> {
            Ok(())
        }

        async fn click(&self, _selector: &str) -> Result<(), BrowserError> {
            Ok(())
        }

        async fn evaluate(&self, _script: &str) -> Result<(), BrowserError> {
            Ok(())
        }

        async fn capture_html(&self) -> Result<String, BrowserError> {
            Ok(String::new())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_navigation_aborts_at_target_deadline() {
        let surface = StalledSurface;
        let crawler = ScrollCrawler::new(&surface, plan(3));

        // 目标总时限之后不久必须已经返回，卡住的导航不能把整轮拖死
        let result = tokio::time::timeout(
            ScrollPlan::default().target_timeout + Duration::from_secs(1),
            crawler.collect("https://example.com/@user", None, parse_lines),
        )
        .await
        .expect("collect must abort by the target deadline");
        assert!(matches!(result, Err(BrowserError::Timeout(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_parent_deadline_returns_partial_results() {
        let surface = FakeSurface::new(vec![
            Ok("a\nb".to_string()),
            Ok("a\nb\nc".to_string()),
        ]);
        let mut p = plan(10);
        // 两轮之后总时限一定已过
        p.target_timeout = Duration::from_secs(12);
        let crawler = ScrollCrawler::new(&surface, p);
        let memes = crawler
            .collect("https://example.com/@user", None, parse_lines)
            .await
            .unwrap();
        // 部分结果被保留，而不是整体作废
        assert!(!memes.is_empty());
        assert!(memes.len() <= 3);
    }
}
