// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 应用服务层

pub mod orchestrator;

pub use orchestrator::{CrawlOrchestrator, SourceReport};
