// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 数据库基础设施

pub mod connection;
pub mod meme_repo_impl;

pub use connection::{create_pool, ensure_schema};
pub use meme_repo_impl::MemeRepositoryImpl;
