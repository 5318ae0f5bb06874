// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 行式JSON备份导出
//!
//! 每条记录在入库前先追加一行JSON到备份文件，数据库损坏或丢失时可由
//! 备份整体重建（见 `import`）。文件在每次采集运行开始时截断重建。

use crate::domain::models::Meme;
use std::path::Path;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("export io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("export serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// 追加式JSON行导出器
///
/// 写入在内部互斥锁下串行，多来源并发追加时行不会交错。
pub struct JsonExporter {
    file: Mutex<File>,
}

impl JsonExporter {
    /// 创建（或截断）备份文件
    pub async fn create(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        let file = File::create(path).await?;
        Ok(Self { file: Mutex::new(file) })
    }

    /// 追加一条记录并立即落盘
    pub async fn append(&self, meme: &Meme) -> Result<(), ExportError> {
        let mut line = serde_json::to_string(meme)?;
        line.push('\n');

        let mut file = self.file.lock().await;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
