// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 梗内容记录
///
/// 采集管线的统一产出单元。`content` 字段刻意复用：既可能是纯文本梗，
/// 也可能是媒体URL，序列化名保留历史格式中的 `url`，下游以 `http` 前缀
/// 区分两种形态（见 [`Meme::is_media_url`]）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Meme {
    /// 展示标题或作者标签
    pub title: String,
    /// 主体内容：纯文本或媒体URL
    #[serde(rename = "url")]
    #[sqlx(rename = "url")]
    pub content: String,
    /// 逗号连接的标签串
    pub tags: String,
    /// 来源定位（非唯一）
    pub source_url: String,
}

impl Meme {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        tags: impl Into<String>,
        source_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tags: tags.into(),
            source_url: source_url.into(),
        }
    }

    /// 内容是否为媒体URL
    ///
    /// 与历史数据格式保持一致的前缀判别：以 `http` 开头视为媒体。
    /// 已知局限：以 "http" 字面开头的纯文本会被误判为媒体，为兼容
    /// 既有数据刻意保留该规则。
    pub fn is_media_url(&self) -> bool {
        self.content.starts_with("http")
    }

    /// 标题与内容均非空才允许进入存储
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty() && !self.content.trim().is_empty()
    }

    /// 去重用的规范键：即内容字段本身
    pub fn canonical_key(&self) -> &str {
        &self.content
    }
}

/// 查询模式：全部、仅媒体、仅文本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    #[default]
    All,
    Image,
    Text,
}

impl SearchMode {
    /// 解析查询参数中的模式字符串，未知值回退为全部
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("image") => SearchMode::Image,
            Some("text") => SearchMode::Text,
            _ => SearchMode::All,
        }
    }

    /// 对应的SQL过滤片段（基于 `http%` 前缀判别）
    pub fn sql_filter(&self) -> &'static str {
        match self {
            SearchMode::All => "",
            SearchMode::Image => " AND url LIKE 'http%'",
            SearchMode::Text => " AND url NOT LIKE 'http%'",
        }
    }

    /// WHERE子句形式的过滤片段
    pub fn sql_where(&self) -> &'static str {
        match self {
            SearchMode::All => "",
            SearchMode::Image => " WHERE url LIKE 'http%'",
            SearchMode::Text => " WHERE url NOT LIKE 'http%'",
        }
    }
}
