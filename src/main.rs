// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! memrs 入口
//!
//! 两种运行模式：
//!
//! * `memrs crawl`（默认）- 跑一轮全来源采集，结果备份并入库
//! * `memrs serve` - 从备份恢复数据库后提供只读查询接口

use memrs::application::CrawlOrchestrator;
use memrs::config::Settings;
use memrs::domain::repositories::MemeRepository;
use memrs::domain::sources::MemeSource;
use memrs::engines::browser::BrowserDriver;
use memrs::engines::fetcher::{RateLimitPolicy, RateLimitedFetcher};
use memrs::infrastructure::database::{create_pool, ensure_schema, MemeRepositoryImpl};
use memrs::infrastructure::export::JsonExporter;
use memrs::infrastructure::import::import_backup;
use memrs::infrastructure::sources::gifvif::GifVifSource;
use memrs::infrastructure::sources::plurk::PlurkSource;
use memrs::infrastructure::sources::ptt::PttSource;
use memrs::infrastructure::sources::scroll::ScrollPlan;
use memrs::infrastructure::sources::threads::ThreadsSource;
use memrs::presentation::build_router;
use memrs::utils::telemetry::init_telemetry;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_telemetry();

    let settings = Settings::load()?;
    let pool = create_pool(&settings.database.url, settings.database.max_connections).await?;
    ensure_schema(&pool).await?;
    let repository: Arc<dyn MemeRepository> = Arc::new(MemeRepositoryImpl::new(pool));

    let mode = std::env::args().nth(1).unwrap_or_else(|| "crawl".to_string());
    match mode.as_str() {
        "crawl" => run_crawl(&settings, repository).await,
        "serve" => run_serve(&settings, repository).await,
        other => anyhow::bail!("unknown mode `{other}`, expected `crawl` or `serve`"),
    }
}

/// 跑一轮全来源采集
async fn run_crawl(
    settings: &Settings,
    repository: Arc<dyn MemeRepository>,
) -> anyhow::Result<()> {
    let exporter = Arc::new(JsonExporter::create(&settings.export.path).await?);
    let mut sources: Vec<Box<dyn MemeSource>> = Vec::new();

    if settings.sources.gif.enabled {
        let gif = &settings.sources.gif;
        let base_url = Url::parse(&gif.base_url)?;
        let host = base_url
            .host_str()
            .ok_or_else(|| anyhow::anyhow!("gif base_url has no host: {}", gif.base_url))?;
        let policy = RateLimitPolicy::for_host(host)
            .with_parallelism(gif.parallelism)
            .with_delays(
                Duration::from_millis(gif.delay_ms),
                Duration::from_millis(gif.random_delay_ms),
            )
            .with_timeout(Duration::from_secs(gif.timeout_secs));
        let fetcher = Arc::new(RateLimitedFetcher::new(policy)?);
        sources.push(Box::new(GifVifSource::new(
            fetcher,
            base_url,
            gif.pages,
            gif.max_items,
        )));
    }

    if settings.sources.ptt.enabled {
        let ptt = &settings.sources.ptt;
        let board_index = Url::parse(&format!(
            "{}/bbs/{}/index.html",
            ptt.base_url.trim_end_matches('/'),
            ptt.board
        ))?;
        let host = board_index
            .host_str()
            .ok_or_else(|| anyhow::anyhow!("ptt base_url has no host: {}", ptt.base_url))?;
        // 看板有年龄确认门，直接带上确认Cookie
        let policy = RateLimitPolicy::for_host(host)
            .with_parallelism(ptt.parallelism)
            .with_delays(
                Duration::from_millis(ptt.delay_ms),
                Duration::from_millis(ptt.random_delay_ms),
            )
            .with_timeout(Duration::from_secs(ptt.timeout_secs))
            .with_cookie("over18=1");
        let fetcher = Arc::new(RateLimitedFetcher::new(policy)?);
        sources.push(Box::new(PttSource::new(
            fetcher,
            board_index,
            ptt.max_posts,
            ptt.max_pages as usize,
            ptt.min_content_len,
        )));
    }

    // 动态来源依赖外部浏览器，连不上时只跳过它们而不是整轮失败
    let needs_browser = settings.sources.threads.enabled || settings.sources.plurk.enabled;
    let _driver = if needs_browser {
        match BrowserDriver::connect(&settings.browser.remote_url).await {
            Ok(driver) => {
                let plan = ScrollPlan {
                    rounds: settings.browser.scroll_rounds,
                    round_timeout: Duration::from_secs(settings.browser.round_timeout_secs),
                    target_timeout: Duration::from_secs(settings.browser.target_timeout_secs),
                    ..ScrollPlan::default()
                };
                if settings.sources.threads.enabled {
                    sources.push(Box::new(ThreadsSource::new(
                        driver.page().clone(),
                        settings.sources.threads.users.clone(),
                        ScrollPlan { jiggle_px: 300, ..plan.clone() },
                    )));
                }
                if settings.sources.plurk.enabled {
                    sources.push(Box::new(PlurkSource::new(
                        driver.page().clone(),
                        settings.sources.plurk.users.clone(),
                        ScrollPlan { jiggle_px: 500, ..plan },
                    )));
                }
                Some(driver)
            }
            Err(e) => {
                warn!(
                    "无法连接远程浏览器 {}（跳过动态来源）: {}",
                    settings.browser.remote_url, e
                );
                None
            }
        }
    } else {
        None
    };

    let orchestrator = CrawlOrchestrator::new(Arc::clone(&repository), exporter);
    let reports = orchestrator.run(&sources).await;

    let stored: usize = reports.iter().map(|r| r.stored).sum();
    let total = repository.count().await?;
    info!("采集完成：新增 {} 条，库内共 {} 条", stored, total);
    Ok(())
}

/// 启动只读查询接口
async fn run_serve(settings: &Settings, repository: Arc<dyn MemeRepository>) -> anyhow::Result<()> {
    let imported = import_backup(&settings.export.path, repository.as_ref()).await?;
    if imported > 0 {
        info!("从备份补齐 {} 条记录", imported);
    }

    let router = build_router(Arc::clone(&repository));
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("查询接口已启动: http://{}", addr);
    axum::serve(listener, router).await?;
    Ok(())
}
