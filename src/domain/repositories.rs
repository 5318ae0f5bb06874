// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::{Meme, SearchMode};
use async_trait::async_trait;
use thiserror::Error;

/// 仓库层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("无效参数: {0}")]
    InvalidParameter(String),
}

/// 梗记录仓库接口
///
/// 存储端以内容列上的唯一约束保证幂等重新摄入：重复插入是无害的
/// 空操作，而不是错误。
#[async_trait]
pub trait MemeRepository: Send + Sync {
    /// 插入一条记录
    ///
    /// # 返回值
    ///
    /// * `Ok(true)` - 新记录已写入
    /// * `Ok(false)` - 记录已存在（良性空操作）
    /// * `Err(RepositoryError)` - 真实的写入失败
    async fn insert(&self, meme: &Meme) -> Result<bool, RepositoryError>;

    /// 记录总数
    async fn count(&self) -> Result<i64, RepositoryError>;

    /// 按标题、标签、内容模糊搜索，mode控制媒体/文本过滤
    async fn search(
        &self,
        query: &str,
        mode: SearchMode,
        limit: i64,
    ) -> Result<Vec<Meme>, RepositoryError>;

    /// 随机抽取一条记录
    async fn random(&self, mode: SearchMode) -> Result<Option<Meme>, RepositoryError>;
}
