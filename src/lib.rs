// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用模块
///
/// 包含爬取编排器等顶层业务流程
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含核心业务实体、来源能力接口和仓库接口
pub mod domain;

/// 引擎模块
///
/// 实现限速HTTP抓取与远程浏览器自动化
pub mod engines;

/// 基础设施模块
///
/// 提供来源爬虫实现、数据库、JSONL备份等外部集成
pub mod infrastructure;

/// 表示层模块
///
/// 处理HTTP查询请求，包括路由和处理器
pub mod presentation;

/// 工具模块
///
/// 提供文本规整、HTML展平和日志初始化等辅助功能
pub mod utils;
