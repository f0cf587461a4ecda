// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.


use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wikimg::application::use_cases::resolve_images::{ResolveImagesUseCase, ResolveOptions};
use wikimg::domain::models::resolution::ResultMap;
use wikimg::domain::repositories::checkpoint_repository::{CheckpointRepository, StorageError};
use wikimg::engines::selectors::{ImageLocator, SelectorStrategy};
use wikimg::engines::validators::ImageValidator;
use wikimg::infrastructure::storage::JsonCheckpointStore;

use fake_browser::{FakeProbe, FakeRenderer};

pub const BASE_URL: &str = "https://wiki.test";

pub fn page_url(name: &str) -> String {
    format!("{}/w/{}", BASE_URL, name)
}

pub fn css(selector: &str) -> SelectorStrategy {
    SelectorStrategy::CssSelector {
        template: selector.to_string(),
    }
}

pub fn options(checkpoint_every: usize) -> ResolveOptions {
    ResolveOptions {
        base_url: BASE_URL.to_string(),
        page_path_prefix: "/w/".to_string(),
        settle_delay: Duration::ZERO,
        request_delay: Duration::ZERO,
        checkpoint_every,
    }
}

pub fn locator(strategies: Vec<SelectorStrategy>) -> ImageLocator {
    let validator = ImageValidator::new(
        Arc::new(FakeProbe),
        BASE_URL,
        "/w/images/",
        Duration::from_secs(5),
    );
    ImageLocator::new(strategies, validator, Duration::from_millis(10))
}

pub fn use_case<S: CheckpointRepository + 'static>(
    renderer: Arc<FakeRenderer>,
    store: Arc<S>,
    strategies: Vec<SelectorStrategy>,
    checkpoint_every: usize,
) -> ResolveImagesUseCase<FakeRenderer, S> {
    ResolveImagesUseCase::new(renderer, store, locator(strategies), options(checkpoint_every))
}

pub fn read_checkpoint(path: &Path) -> serde_json::Value {
    let text = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&text).unwrap()
}

/// 记录每一次写入内容的检查点存储
pub struct RecordingStore {
    inner: JsonCheckpointStore,
    snapshots: Mutex<Vec<ResultMap>>,
}

impl RecordingStore {
    pub fn new(inner: JsonCheckpointStore) -> Self {
        Self {
            inner,
            snapshots: Mutex::new(Vec::new()),
        }
    }

    pub fn snapshots(&self) -> Vec<ResultMap> {
        self.snapshots.lock().unwrap().clone()
    }
}

#[async_trait]
impl CheckpointRepository for RecordingStore {
    async fn load(&self) -> ResultMap {
        self.inner.load().await
    }

    async fn save(&self, map: &ResultMap) -> Result<(), StorageError> {
        self.snapshots.lock().unwrap().push(map.clone());
        self.inner.save(map).await
    }
}
