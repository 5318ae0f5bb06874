// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

/// 浏览器自动化错误类型
#[derive(Error, Debug)]
pub enum BrowserError {
    /// 无法连到远程调试端点
    #[error("failed to connect to remote browser: {0}")]
    Connect(String),
    /// 导航失败
    #[error("navigation failed: {0}")]
    Navigation(String),
    /// 脚本执行失败
    #[error("script evaluation failed: {0}")]
    Script(String),
    /// 元素未找到
    #[error("element not found: {0}")]
    ElementNotFound(String),
    /// 自动化步骤超时
    #[error("automation step timed out: {0}")]
    Timeout(String),
    /// 其他CDP错误
    #[error("browser error: {0}")]
    Cdp(String),
}

/// 滚动表面：动态来源依赖的自动化步骤集合
///
/// 每个步骤都是一次可失败、可超时约束的RPC式调用。真实实现包装
/// 远程Chrome页面；测试用假实现回放预置的快照。
#[async_trait]
pub trait ScrollSurface: Send + Sync {
    /// 导航到目标页面
    async fn navigate(&self, url: &str) -> Result<(), BrowserError>;

    /// 在限定时间内等待元素出现
    async fn wait_visible(&self, selector: &str, timeout: Duration) -> Result<(), BrowserError>;

    /// 点击匹配选择器的元素
    async fn click(&self, selector: &str) -> Result<(), BrowserError>;

    /// 执行一段页面脚本
    async fn evaluate(&self, script: &str) -> Result<(), BrowserError>;

    /// 抓取当前完整文档标记
    async fn capture_html(&self) -> Result<String, BrowserError>;
}

/// 远程浏览器驱动
///
/// 连接到一个可寻址的Chrome DevTools端点，并持有唯一的页面上下文。
/// 动态来源顺序复用同一个页面，保持对远程浏览器的负载可预期。
pub struct BrowserDriver {
    _browser: Browser,
    page: BrowserPage,
}

impl BrowserDriver {
    /// 连接远程调试端点并打开一个空白页
    ///
    /// 事件流在独立任务中被持续消费，直到连接断开。
    pub async fn connect(ws_url: &str) -> Result<Self, BrowserError> {
        let (browser, mut handler) = Browser::connect(ws_url)
            .await
            .map_err(|e| BrowserError::Connect(e.to_string()))?;

        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::Cdp(e.to_string()))?;

        Ok(Self {
            _browser: browser,
            page: BrowserPage { page },
        })
    }

    /// 共享的页面上下文
    pub fn page(&self) -> &BrowserPage {
        &self.page
    }
}

/// 包装单个远程页面的滚动表面实现
#[derive(Clone)]
pub struct BrowserPage {
    page: Page,
}

/// 生成判定元素可见的页内脚本
///
/// 存在不等于可见：虚拟化信息流会保留零尺寸的占位节点，所以用
/// 布局盒尺寸判定；文档根元素本身没有常规布局盒，单独放行。
fn visibility_script(selector: &str) -> String {
    let escaped = selector.replace('\\', "\\\\").replace('\'', "\\'");
    format!(
        "(() => {{ \
            const el = document.querySelector('{escaped}'); \
            if (!el) return false; \
            if (el === document.documentElement || el === document.body) return true; \
            const rect = el.getBoundingClientRect(); \
            return rect.width > 0 && rect.height > 0; \
        }})()"
    )
}

#[async_trait]
impl ScrollSurface for BrowserPage {
    async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::Navigation(format!("{}: {}", url, e)))?;
        Ok(())
    }

    async fn wait_visible(&self, selector: &str, timeout: Duration) -> Result<(), BrowserError> {
        // CDP没有原生的可见性等待，轮询页内检查脚本直到可见或超时
        let check = visibility_script(selector);
        let deadline = Instant::now() + timeout;
        loop {
            let visible = self
                .page
                .evaluate(check.as_str())
                .await
                .ok()
                .and_then(|result| result.value().and_then(|v| v.as_bool()))
                .unwrap_or(false);
            if visible {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(BrowserError::Timeout(format!(
                    "waiting for `{}` to become visible",
                    selector
                )));
            }
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
    }

    async fn click(&self, selector: &str) -> Result<(), BrowserError> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|e| BrowserError::ElementNotFound(format!("{}: {}", selector, e)))?;
        element
            .click()
            .await
            .map_err(|e| BrowserError::Cdp(e.to_string()))?;
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> Result<(), BrowserError> {
        self.page
            .evaluate(script)
            .await
            .map_err(|e| BrowserError::Script(e.to_string()))?;
        Ok(())
    }

    async fn capture_html(&self) -> Result<String, BrowserError> {
        self.page
            .content()
            .await
            .map_err(|e| BrowserError::Cdp(e.to_string()))
    }
}
