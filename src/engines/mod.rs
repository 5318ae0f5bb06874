// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 远程浏览器自动化
pub mod browser;

/// 限速HTTP抓取
pub mod fetcher;
