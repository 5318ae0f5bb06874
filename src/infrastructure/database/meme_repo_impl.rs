// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 梗仓储的SQLite实现

use crate::domain::models::{Meme, SearchMode};
use crate::domain::repositories::{MemeRepository, RepositoryError};
use async_trait::async_trait;
use sqlx::SqlitePool;

/// 基于SQLite的梗仓储
pub struct MemeRepositoryImpl {
    pool: SqlitePool,
}

impl MemeRepositoryImpl {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn db_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::DatabaseError(e.to_string())
}

#[async_trait]
impl MemeRepository for MemeRepositoryImpl {
    /// 插入一条记录，`url` 撞唯一约束时静默忽略
    ///
    /// 返回是否真的写入了新行。
    async fn insert(&self, meme: &Meme) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO memes (title, url, tags, source_url) VALUES (?, ?, ?, ?)",
        )
        .bind(&meme.title)
        .bind(&meme.content)
        .bind(&meme.tags)
        .bind(&meme.source_url)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM memes")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(count)
    }

    /// 在标题、标签与内容上做子串匹配，新记录优先
    async fn search(
        &self,
        query: &str,
        mode: SearchMode,
        limit: i64,
    ) -> Result<Vec<Meme>, RepositoryError> {
        let sql = format!(
            "SELECT title, url, tags, source_url FROM memes \
             WHERE (title LIKE ? OR tags LIKE ? OR url LIKE ?){} \
             ORDER BY id DESC LIMIT ?",
            mode.sql_filter()
        );
        let pattern = format!("%{query}%");
        sqlx::query_as::<_, Meme>(&sql)
            .bind(&pattern)
            .bind(&pattern)
            .bind(&pattern)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)
    }

    /// 随机抽取一条记录，库为空时返回 `None`
    async fn random(&self, mode: SearchMode) -> Result<Option<Meme>, RepositoryError> {
        let sql = format!(
            "SELECT title, url, tags, source_url FROM memes{} ORDER BY RANDOM() LIMIT 1",
            mode.sql_where()
        );
        sqlx::query_as::<_, Meme>(&sql)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)
    }
}
