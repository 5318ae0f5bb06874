// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 采集编排
//!
//! 顺序驱动已注册的来源：先整体备份、再入库、最后汇总。单个来源失败
//! 只影响它自己的报告，其余来源照常执行。

use crate::domain::models::Meme;
use crate::domain::repositories::MemeRepository;
use crate::domain::sources::MemeSource;
use crate::infrastructure::export::JsonExporter;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 单个来源的运行报告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    /// 来源名
    pub source: &'static str,
    /// 来源产出的候选数
    pub extracted: usize,
    /// 实际入库的新记录数
    pub stored: usize,
}

/// 采集编排器
pub struct CrawlOrchestrator {
    repository: Arc<dyn MemeRepository>,
    exporter: Arc<JsonExporter>,
}

impl CrawlOrchestrator {
    pub fn new(repository: Arc<dyn MemeRepository>, exporter: Arc<JsonExporter>) -> Self {
        Self { repository, exporter }
    }

    /// 依次运行全部来源并返回逐来源报告
    pub async fn run(&self, sources: &[Box<dyn MemeSource>]) -> Vec<SourceReport> {
        let mut reports = Vec::with_capacity(sources.len());

        for source in sources {
            info!("==> 开始采集来源: {}", source.name());
            let memes = match source.scrape().await {
                Ok(memes) => memes,
                Err(e) => {
                    warn!("来源 {} 采集失败: {}", source.name(), e);
                    reports.push(SourceReport { source: source.name(), extracted: 0, stored: 0 });
                    continue;
                }
            };

            let report = self.persist(source.name(), &memes).await;
            info!(
                "来源 {} 完成: 提取 {} 条，新增入库 {} 条",
                report.source, report.extracted, report.stored
            );
            reports.push(report);
        }

        let total: usize = reports.iter().map(|r| r.stored).sum();
        info!("本轮采集结束，共新增 {} 条记录", total);
        reports
    }

    /// 备份并入库一批候选记录
    async fn persist(&self, source: &'static str, memes: &[Meme]) -> SourceReport {
        let mut stored = 0;
        for meme in memes {
            if !meme.is_valid() {
                debug!("丢弃空记录（来源 {}）", source);
                continue;
            }

            // 备份先于入库：数据库写失败时备份里仍有这条记录
            if let Err(e) = self.exporter.append(meme).await {
                warn!("备份写入失败: {}", e);
            }

            match self.repository.insert(meme).await {
                Ok(true) => stored += 1,
                Ok(false) => debug!("重复内容已忽略: {:.40}", meme.content),
                Err(e) => warn!("入库失败: {}", e),
            }
        }
        SourceReport { source, extracted: memes.len(), stored }
    }
}
