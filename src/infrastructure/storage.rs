// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::domain::models::resolution::ResultMap;
use crate::domain::repositories::checkpoint_repository::{CheckpointRepository, StorageError};

/// 本地 JSON 检查点存储
///
/// 检查点和覆盖文件格式相同：`条目名称 -> 图片地址 | false`
pub struct JsonCheckpointStore {
    checkpoint_path: PathBuf,
    overrides_path: Option<PathBuf>,
}

impl JsonCheckpointStore {
    pub fn new(checkpoint_path: impl Into<PathBuf>, overrides_path: Option<PathBuf>) -> Self {
        Self {
            checkpoint_path: checkpoint_path.into(),
            overrides_path,
        }
    }

    pub fn checkpoint_path(&self) -> &Path {
        &self.checkpoint_path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .checkpoint_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "checkpoint".into());
        name.push(".tmp");
        self.checkpoint_path.with_file_name(name)
    }
}

/// 读取映射文件，文件缺失或内容损坏时返回空映射
async fn read_map(path: &Path, label: &str) -> ResultMap {
    match fs::read(path).await {
        Ok(data) => match serde_json::from_slice(&data) {
            Ok(map) => map,
            Err(e) => {
                warn!("Ignoring malformed {} file {}: {}", label, path.display(), e);
                ResultMap::new()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No {} file at {}", label, path.display());
            ResultMap::new()
        }
        Err(e) => {
            warn!("Could not read {} file {}: {}", label, path.display(), e);
            ResultMap::new()
        }
    }
}

#[async_trait]
impl CheckpointRepository for JsonCheckpointStore {
    async fn load(&self) -> ResultMap {
        let mut map = read_map(&self.checkpoint_path, "checkpoint").await;
        if let Some(overrides_path) = &self.overrides_path {
            let overrides = read_map(overrides_path, "overrides").await;
            if !overrides.is_empty() {
                info!("Applying {} manual overrides", overrides.len());
            }
            map.merge_overrides(overrides);
        }
        map
    }

    async fn save(&self, map: &ResultMap) -> Result<(), StorageError> {
        let data = serde_json::to_vec_pretty(map)?;

        if let Some(parent) = self.checkpoint_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        // Write beside the target, then swap it in with a rename
        let temp_path = self.temp_path();
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(&data).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&temp_path, &self.checkpoint_path).await?;

        info!(
            "Data saved to {} ({} entries)",
            self.checkpoint_path.display(),
            map.len()
        );
        Ok(())
    }
}

/// 测试用的内存检查点实现
#[derive(Default)]
pub struct InMemoryCheckpointStore {
    data: tokio::sync::RwLock<ResultMap>,
    saves: std::sync::atomic::AtomicUsize,
}

impl InMemoryCheckpointStore {
    pub fn new(initial: ResultMap) -> Self {
        Self {
            data: tokio::sync::RwLock::new(initial),
            saves: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub async fn snapshot(&self) -> ResultMap {
        self.data.read().await.clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait]
impl CheckpointRepository for InMemoryCheckpointStore {
    async fn load(&self) -> ResultMap {
        self.data.read().await.clone()
    }

    async fn save(&self, map: &ResultMap) -> Result<(), StorageError> {
        *self.data.write().await = map.clone();
        self.saves.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(())
    }
}
