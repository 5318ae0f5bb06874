// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// HTML展平辅助
pub mod html;

/// 样板文本规整
pub mod normalize;

/// 日志初始化
pub mod telemetry;
