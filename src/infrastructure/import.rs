// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 从行式JSON备份恢复数据库
//!
//! 服务模式启动时调用：备份文件不存在不是错误（首次运行的正常状态），
//! 坏行跳过并告警，已存在的记录由仓储的去重语义自然忽略。

use crate::domain::repositories::{MemeRepository, RepositoryError};
use crate::domain::models::Meme;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

/// 把备份文件中的记录逐行灌入仓储，返回实际新增的行数
pub async fn import_backup(
    path: impl AsRef<Path>,
    repository: &dyn MemeRepository,
) -> Result<u64, RepositoryError> {
    let path = path.as_ref();
    let file = match File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("备份文件不存在，跳过恢复: {}", path.display());
            return Ok(0);
        }
        Err(e) => {
            return Err(RepositoryError::DatabaseError(format!(
                "failed to open backup {}: {e}",
                path.display()
            )))
        }
    };

    let mut lines = BufReader::new(file).lines();
    let mut imported = 0u64;
    let mut line_no = 0u64;
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| RepositoryError::DatabaseError(format!("failed to read backup: {e}")))?
    {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }
        let meme: Meme = match serde_json::from_str(&line) {
            Ok(meme) => meme,
            Err(e) => {
                warn!("备份第 {} 行无法解析（跳过）: {}", line_no, e);
                continue;
            }
        };
        if repository.insert(&meme).await? {
            imported += 1;
        }
    }

    info!("备份恢复完成，新增 {} 条记录", imported);
    Ok(imported)
}
