// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 分层配置
//!
//! 内置默认值 < 配置文件（`config/default.toml`、`config/local.toml`，
//! 均可缺省）< `MEMRS_` 前缀的环境变量（双下划线分隔层级，例如
//! `MEMRS_SERVER__PORT=9090`）。

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub export: ExportSettings,
    pub browser: BrowserSettings,
    pub sources: SourceSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportSettings {
    /// 行式JSON备份文件路径
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    /// 远程Chrome调试端点
    pub remote_url: String,
    pub scroll_rounds: u32,
    pub round_timeout_secs: u64,
    /// 单个目标的总时限
    pub target_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceSettings {
    pub gif: GifSettings,
    pub ptt: PttSettings,
    pub threads: AccountListSettings,
    pub plurk: AccountListSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GifSettings {
    pub enabled: bool,
    pub base_url: String,
    /// 增量加载的页数
    pub pages: u32,
    pub max_items: usize,
    pub delay_ms: u64,
    pub random_delay_ms: u64,
    pub parallelism: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PttSettings {
    pub enabled: bool,
    pub base_url: String,
    pub board: String,
    pub max_posts: usize,
    pub max_pages: u32,
    /// 正文最小字节数
    pub min_content_len: usize,
    pub delay_ms: u64,
    pub random_delay_ms: u64,
    pub parallelism: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountListSettings {
    pub enabled: bool,
    pub users: Vec<String>,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("database.url", "sqlite://memes.db")?
            .set_default("database.max_connections", 5)?
            .set_default("export.path", "memes_raw_data.json")?
            .set_default("browser.remote_url", "ws://127.0.0.1:9222/")?
            .set_default("browser.scroll_rounds", 10)?
            .set_default("browser.round_timeout_secs", 15)?
            .set_default("browser.target_timeout_secs", 300)?
            .set_default("sources.gif.enabled", true)?
            .set_default("sources.gif.base_url", "https://www.gif-vif.com/")?
            .set_default("sources.gif.pages", 6)?
            .set_default("sources.gif.max_items", 200)?
            .set_default("sources.gif.delay_ms", 2000)?
            .set_default("sources.gif.random_delay_ms", 1000)?
            .set_default("sources.gif.parallelism", 5)?
            .set_default("sources.gif.timeout_secs", 30)?
            .set_default("sources.ptt.enabled", true)?
            .set_default("sources.ptt.base_url", "https://www.ptt.cc")?
            .set_default("sources.ptt.board", "Joke")?
            .set_default("sources.ptt.max_posts", 200)?
            .set_default("sources.ptt.max_pages", 20)?
            .set_default("sources.ptt.min_content_len", 50)?
            .set_default("sources.ptt.delay_ms", 2000)?
            .set_default("sources.ptt.random_delay_ms", 1000)?
            .set_default("sources.ptt.parallelism", 1)?
            .set_default("sources.ptt.timeout_secs", 30)?
            .set_default("sources.threads.enabled", true)?
            .set_default(
                "sources.threads.users",
                vec!["ctrl.v.book".to_string(), "shuixian1002".to_string()],
            )?
            .set_default("sources.plurk.enabled", true)?
            .set_default("sources.plurk.users", vec!["copypasta".to_string()])?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("MEMRS").separator("__"));

        builder.build()?.try_deserialize()
    }
}
