// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::Meme;
use std::collections::HashSet;

/// 单目标滚动爬取会话
///
/// 持有本轮会话内已见过的规范键集合与累计结果。由发起滚动循环的
/// 调用方独占，循环结束即丢弃，不跨目标、不跨线程共享。
#[derive(Debug, Default)]
pub struct CrawlSession {
    seen: HashSet<String>,
    memes: Vec<Meme>,
}

impl CrawlSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按规范键做增量去重，首次出现的记录被纳入累计结果
    ///
    /// 每轮滚动快照与之前轮次大量重叠，只有未见过的键会返回true。
    pub fn admit(&mut self, meme: Meme) -> bool {
        if self.seen.contains(meme.canonical_key()) {
            return false;
        }
        self.seen.insert(meme.canonical_key().to_string());
        self.memes.push(meme);
        true
    }

    pub fn len(&self) -> usize {
        self.memes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memes.is_empty()
    }

    pub fn into_memes(self) -> Vec<Meme> {
        self.memes
    }
}
