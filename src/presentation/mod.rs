// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! HTTP读取接口

pub mod handlers;
pub mod routes;

pub use routes::{build_router, AppState};
