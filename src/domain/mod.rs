// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型
pub mod models;

/// 仓库接口
pub mod repositories;

/// 爬取会话
pub mod session;

/// 来源能力接口
pub mod sources;
