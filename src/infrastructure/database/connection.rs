// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! SQLite连接池的创建与模式初始化

use crate::domain::repositories::RepositoryError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::info;

/// 创建SQLite连接池，数据库文件不存在时自动创建
pub async fn create_pool(url: &str, max_connections: u32) -> Result<SqlitePool, RepositoryError> {
    let options = SqliteConnectOptions::from_str(url)
        .map_err(|e| RepositoryError::DatabaseError(format!("invalid database url: {e}")))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .map_err(|e| RepositoryError::DatabaseError(format!("failed to connect: {e}")))?;

    info!("数据库连接池已就绪: {}", url);
    Ok(pool)
}

/// 确保梗表存在
///
/// `url` 列上的唯一约束是去重的最终防线：无论上游会话去重是否生效，
/// 重复内容都无法二次入库。
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), RepositoryError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS memes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            url TEXT NOT NULL UNIQUE,
            tags TEXT NOT NULL DEFAULT '',
            source_url TEXT NOT NULL DEFAULT '',
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| RepositoryError::DatabaseError(format!("failed to create schema: {e}")))?;
    Ok(())
}
