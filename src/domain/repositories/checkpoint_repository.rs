// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::resolution::ResultMap;

/// 存储错误类型
#[derive(Error, Debug)]
pub enum StorageError {
    /// IO错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// 序列化错误
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// 检查点仓库特质
///
/// 结果映射的持久化接口。`load` 永远不会因为文件缺失或内容损坏而失败，
/// 这两种情况都视为空映射。
#[async_trait]
pub trait CheckpointRepository: Send + Sync {
    /// 加载上次的检查点，并以覆盖文件合并其上
    async fn load(&self) -> ResultMap;

    /// 整体重写检查点文件
    async fn save(&self, map: &ResultMap) -> Result<(), StorageError>;
}
