// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::Meme;
use crate::engines::browser::BrowserError;
use crate::engines::fetcher::FetchError;
use async_trait::async_trait;
use thiserror::Error;

/// 来源层错误类型
#[derive(Error, Debug)]
pub enum SourceError {
    /// HTTP抓取失败
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    /// 浏览器自动化失败
    #[error("browser automation failed: {0}")]
    Browser(#[from] BrowserError),
    /// 来源整体不可用
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// 来源能力接口
///
/// 静态分页、论坛、动态滚动等策略共享同一份契约：对配置好的目标
/// 产出一批规范记录。编排器只依赖此接口，不关心具体来源类型。
/// 单个条目的解析失败不应越过条目边界，应在实现内部丢弃。
#[async_trait]
pub trait MemeSource: Send + Sync {
    /// 来源名称，用于进度与汇总日志
    fn name(&self) -> &'static str;

    /// 执行一次完整采集
    ///
    /// # 返回值
    ///
    /// * `Ok(Vec<Meme>)` - 本次采集产出的全部记录（可能为空）
    /// * `Err(SourceError)` - 来源整体不可用，由编排器记为零产出
    async fn scrape(&self) -> Result<Vec<Meme>, SourceError>;
}
