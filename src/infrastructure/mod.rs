// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据库连接与仓库实现
pub mod database;

/// JSONL备份写入
pub mod export;

/// JSONL备份回灌
pub mod import;

/// 来源爬虫实现
pub mod sources;
