// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 样板文本规整
//!
//! 把提取选择器吐出的原始文本变成干净记录：去掉不换行空格、按来源
//! 专属的有序规则表剥离头尾样板（关注横幅、互动计数页脚）、剔除行内
//! 重复的作者标签，最后按最小长度与排除列表过滤。
//!
//! 规则表是声明式的 {模式, 替换} 序列，由同一个通用例程执行；脆弱的
//! 来源特定启发式全部收敛在表里，算法本身保持稳定。页脚模式锚定在
//! 文本末尾并要求四个互动标签按序齐全：宁可少剥（留下残缺页脚）也
//! 不能误伤正文。

use once_cell::sync::Lazy;
use regex::Regex;

/// 来源专属的规整配置
pub struct NormalizeProfile {
    /// 有序执行的 {模式, 替换} 规则表
    rules: Vec<(Regex, &'static str)>,
    /// 清理后字节长度不超过该值的文本被丢弃
    min_len: usize,
    /// 命中即整条丢弃的子串（登录提示、成人内容遮罩等）
    exclusions: &'static [&'static str],
}

/// Threads贴文的规整配置
///
/// 头部是「追蹤…更多」关注横幅（有时只剩「追蹤」一词），尾部是
/// 讚/回覆/轉發/分享四个计数按钮，前面可能紧贴一个「翻譯」标记，
/// 数字可带 萬/k/K/+ 单位与千分位逗号。
pub static THREADS: Lazy<NormalizeProfile> = Lazy::new(|| NormalizeProfile {
    rules: vec![
        (Regex::new(r"(?s)^追蹤.*?更多").expect("threads header pattern"), ""),
        (Regex::new(r"^追蹤\s*").expect("threads bare header pattern"), ""),
        (
            Regex::new(
                r"(?s)(?:翻譯\s*)?讚[\d\.\s萬kK\+,]*回覆[\d\.\s萬kK\+,]*轉發[\d\.\s萬kK\+,]*分享[\d\.\s萬kK\+,]*$",
            )
            .expect("threads footer pattern"),
            "",
        ),
    ],
    min_len: 5,
    exclusions: &["Log in", "登入"],
});

/// Plurk行动版时间轴的规整配置
///
/// 行动版页面没有互动页脚，只需过滤成人内容遮罩与空噪音。
pub static PLURK: Lazy<NormalizeProfile> = Lazy::new(|| NormalizeProfile {
    rules: Vec::new(),
    min_len: 1,
    exclusions: &["被標示為含有成人內容"],
});

impl NormalizeProfile {
    /// 规整一段原始文本
    ///
    /// # 参数
    ///
    /// * `raw` - 提取选择器产出的原始文本（`<br>` 已转换行）
    /// * `author` - 作者标签；信息流常把作者名行内重复在正文前
    ///
    /// # 返回值
    ///
    /// * `Some(String)` - 清理后的正文
    /// * `None` - 过短或命中排除列表，正常的过滤结果而非错误
    pub fn clean(&self, raw: &str, author: Option<&str>) -> Option<String> {
        let mut text = raw.replace('\u{00A0}', " ");
        text = text.trim().to_string();

        for (pattern, replacement) in &self.rules {
            text = pattern.replace_all(&text, *replacement).into_owned();
        }
        text = text.trim().to_string();

        if let Some(author) = author {
            if let Some(stripped) = text.strip_prefix(author) {
                text = stripped.trim().to_string();
            }
        }

        if text.len() <= self.min_len {
            return None;
        }
        if self.exclusions.iter().any(|needle| text.contains(needle)) {
            return None;
        }
        Some(text)
    }
}
