// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// GIF图库来源（静态分页）
pub mod gifvif;

/// 静态分页爬取驱动
pub mod paginated;

/// Plurk时间轴来源（动态滚动）
pub mod plurk;

/// PTT看板来源（论坛分页）
pub mod ptt;

/// 动态滚动爬取驱动
pub mod scroll;

/// Threads信息流来源（动态滚动）
pub mod threads;
