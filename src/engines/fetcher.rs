// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, Semaphore};
use tokio::time::Instant;
use url::Url;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// 抓取层错误类型
#[derive(Error, Debug)]
pub enum FetchError {
    /// 请求超时
    #[error("request timed out: {0}")]
    Timeout(String),
    /// 目标域名不在许可列表内（越界链接被静默拒绝，不算故障）
    #[error("host out of scope: {0}")]
    OutOfScope(String),
    /// 非成功状态码
    #[error("unexpected status {status} for {url}")]
    Status { status: u16, url: String },
    /// 请求失败
    #[error("request failed: {0}")]
    Request(reqwest::Error),
    /// 客户端构建失败
    #[error("client build failed: {0}")]
    Client(reqwest::Error),
}

/// 单域名的限速策略
///
/// 爬取开始后不再变更：并发上限、固定间隔加有界随机抖动、
/// 单请求超时，以及防止链接跟随失控的域名许可列表。
#[derive(Debug, Clone)]
pub struct RateLimitPolicy {
    /// 许可的主机名列表
    pub allowed_hosts: Vec<String>,
    /// 同域并发请求上限
    pub parallelism: usize,
    /// 同域两次派发之间的固定间隔
    pub delay: Duration,
    /// 附加的随机抖动上界
    pub random_delay: Duration,
    /// 单请求超时
    pub timeout: Duration,
    /// 随请求固定携带的Cookie头（如论坛的年龄确认）
    pub cookie: Option<String>,
}

impl RateLimitPolicy {
    pub fn for_host(host: impl Into<String>) -> Self {
        Self {
            allowed_hosts: vec![host.into()],
            parallelism: 1,
            delay: Duration::from_millis(2000),
            random_delay: Duration::from_millis(1000),
            timeout: Duration::from_secs(30),
            cookie: None,
        }
    }

    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism.max(1);
        self
    }

    pub fn with_delays(mut self, delay: Duration, random_delay: Duration) -> Self {
        self.delay = delay;
        self.random_delay = random_delay;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }
}

/// 抓取结果页面
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// 实际响应的URL
    pub url: Url,
    /// Content-Type头
    pub content_type: String,
    /// 响应正文
    pub body: String,
}

impl FetchedPage {
    pub fn is_json(&self) -> bool {
        self.content_type.contains("application/json")
    }

    pub fn is_html(&self) -> bool {
        self.content_type.contains("text/html")
    }

    /// 把页面内的相对链接解析为绝对URL
    pub fn resolve(&self, href: &str) -> Option<Url> {
        self.url.join(href).ok()
    }
}

/// 限速抓取器
///
/// 在单一域名族上执行GET请求：同一时刻最多 `parallelism` 个在途请求，
/// 相邻两次派发之间至少间隔 `delay` 加随机抖动，单请求受超时约束。
/// 重复抓取同一URL是允许的（幂等，无内建缓存）。
pub struct RateLimitedFetcher {
    client: reqwest::Client,
    policy: RateLimitPolicy,
    permits: Semaphore,
    /// 下一次允许派发的时刻；串行化的派发闸门
    next_dispatch: Mutex<Instant>,
}

impl RateLimitedFetcher {
    pub fn new(policy: RateLimitPolicy) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .timeout(policy.timeout)
            .cookie_store(true)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            permits: Semaphore::new(policy.parallelism.max(1)),
            next_dispatch: Mutex::new(Instant::now()),
            policy,
        })
    }

    /// 抓取一个URL
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchedPage)` - 响应正文与内容类型
    /// * `Err(FetchError)` - 越界、超时或传输失败
    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let host = url.host_str().unwrap_or_default();
        if !self.policy.allowed_hosts.iter().any(|h| h == host) {
            return Err(FetchError::OutOfScope(url.to_string()));
        }

        let _permit = self
            .permits
            .acquire()
            .await
            .expect("fetcher semaphore closed");
        self.pace().await;

        let mut request = self.client.get(url.clone()).header(
            reqwest::header::ACCEPT,
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        );
        if let Some(cookie) = &self.policy.cookie {
            request = request.header(reqwest::header::COOKIE, cookie);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(url.to_string())
            } else {
                FetchError::Request(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("text/html")
            .to_string();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(url.to_string())
            } else {
                FetchError::Request(e)
            }
        })?;

        Ok(FetchedPage {
            url: final_url,
            content_type,
            body,
        })
    }

    /// 派发节流：为本次请求预约派发时刻并等待
    ///
    /// 闸门在锁内推进（delay + 随机抖动），等待在锁外进行，
    /// 因此并发调用者会得到彼此错开的派发时刻。
    async fn pace(&self) {
        let dispatch_at = {
            let mut next = self.next_dispatch.lock().await;
            let now = Instant::now();
            let at = if *next > now { *next } else { now };
            let jitter_ms = if self.policy.random_delay.is_zero() {
                0
            } else {
                rand::random_range(0..=self.policy.random_delay.as_millis() as u64)
            };
            *next = at + self.policy.delay + Duration::from_millis(jitter_ms);
            at
        };
        tokio::time::sleep_until(dispatch_at).await;
    }
}
