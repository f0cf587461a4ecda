// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::settings::ResolverSettings;
use crate::domain::models::catalog::Catalog;
use crate::domain::models::resolution::{ResolutionResult, ResultMap};
use crate::domain::repositories::checkpoint_repository::{CheckpointRepository, StorageError};
use crate::engines::selectors::ImageLocator;
use crate::engines::traits::{EngineError, PageRenderer};
use crate::utils::url_utils::entity_page_url;

#[derive(Error, Debug)]
pub enum ResolveUseCaseError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
    #[error("Resolution loop panicked: {0}")]
    Panicked(String),
}

/// 编排器的运行参数
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    pub base_url: String,
    pub page_path_prefix: String,
    pub settle_delay: Duration,
    pub request_delay: Duration,
    pub checkpoint_every: usize,
}

impl From<&ResolverSettings> for ResolveOptions {
    fn from(settings: &ResolverSettings) -> Self {
        Self {
            base_url: settings.base_url.clone(),
            page_path_prefix: settings.page_path_prefix.clone(),
            settle_delay: settings.settle_delay(),
            request_delay: settings.request_delay(),
            checkpoint_every: settings.checkpoint_every,
        }
    }
}

/// 一次运行的统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// 目录中的条目数
    pub total: usize,
    /// 已有结果而跳过的条目数
    pub skipped: usize,
    /// 本次实际处理的条目数
    pub processed: usize,
    /// 结果映射中有图片的条目数
    pub succeeded: usize,
    /// 结果映射中未找到图片的条目数
    pub failed: usize,
    /// 因不在目录中而删除的旧条目数
    pub culled: usize,
    /// 是否被中断
    pub interrupted: bool,
}

/// 图片解析用例
///
/// 逐个条目执行 渲染 -> 解析 -> 记录，独占结果映射和浏览器会话。
/// 无论运行如何结束，都会写出最终检查点并关闭浏览器。
pub struct ResolveImagesUseCase<R, S> {
    renderer: Arc<R>,
    store: Arc<S>,
    locator: ImageLocator,
    options: ResolveOptions,
}

impl<R, S> ResolveImagesUseCase<R, S>
where
    R: PageRenderer + 'static,
    S: CheckpointRepository + 'static,
{
    pub fn new(renderer: Arc<R>, store: Arc<S>, locator: ImageLocator, options: ResolveOptions) -> Self {
        Self {
            renderer,
            store,
            locator,
            options,
        }
    }

    /// 运行整个批次
    ///
    /// # 参数
    ///
    /// * `catalog` - 本次运行的条目目录快照
    /// * `shutdown` - 完成时表示用户请求中断
    ///
    /// # 返回值
    ///
    /// * `Ok(RunSummary)` - 批次完成或被中断，检查点已写出
    /// * `Err(ResolveUseCaseError)` - 检查点写入或浏览器关闭失败
    pub async fn run<F>(
        &self,
        catalog: &Catalog,
        shutdown: F,
    ) -> Result<RunSummary, ResolveUseCaseError>
    where
        F: Future<Output = ()>,
    {
        let mut summary = RunSummary {
            total: catalog.len(),
            ..Default::default()
        };

        let mut results = self.store.load().await;
        info!("Already scraped: {} items", results.len());

        let removed = results.cull(catalog);
        summary.culled = removed.len();
        if removed.is_empty() {
            info!("No outdated items found to cull");
        } else {
            for name in &removed {
                info!("Removing outdated item: {}", name);
            }
            info!("Culled {} outdated items", removed.len());
        }

        // Persist the cull before any page is touched
        let loop_result = match self.store.save(&results).await {
            Ok(()) => {
                let batch = AssertUnwindSafe(self.process_pending(catalog, &mut results, &mut summary))
                    .catch_unwind();
                tokio::select! {
                    outcome = batch => Some(outcome),
                    _ = shutdown => None,
                }
            }
            Err(e) => Some(Ok(Err(e.into()))),
        };

        let loop_result = match loop_result {
            Some(Ok(result)) => result,
            Some(Err(panic)) => {
                let reason = panic_reason(panic.as_ref());
                error!("Unexpected error during resolution: {}", reason);
                Err(ResolveUseCaseError::Panicked(reason))
            }
            None => {
                warn!("Scraping interrupted by user, saving progress");
                summary.interrupted = true;
                Ok(())
            }
        };

        // Guaranteed cleanup: final checkpoint, then release the browser
        let save_result = self.store.save(&results).await;
        if let Err(e) = &save_result {
            error!("Final checkpoint failed: {}", e);
        }
        let shutdown_result = self.renderer.shutdown().await;
        if let Err(e) = &shutdown_result {
            error!("Failed to shut down {} renderer: {}", self.renderer.name(), e);
        }

        summary.succeeded = results.succeeded();
        summary.failed = results.failed();
        info!(
            "Total items: {}, successful: {}, failed: {}, processed this run: {}",
            results.len(),
            summary.succeeded,
            summary.failed,
            summary.processed
        );

        loop_result?;
        save_result?;
        shutdown_result?;
        Ok(summary)
    }

    async fn process_pending(
        &self,
        catalog: &Catalog,
        results: &mut ResultMap,
        summary: &mut RunSummary,
    ) -> Result<(), ResolveUseCaseError> {
        for name in catalog.names() {
            if results.contains(name) {
                debug!("Skipping {} (already scraped)", name);
                summary.skipped += 1;
                continue;
            }

            // A panic on one page is recorded as NotFound
            let result = match AssertUnwindSafe(self.resolve_entity(name)).catch_unwind().await {
                Ok(result) => result,
                Err(panic) => {
                    error!("Error scraping {}: {}", name, panic_reason(panic.as_ref()));
                    ResolutionResult::NotFound
                }
            };
            results.record(name.clone(), result);
            summary.processed += 1;

            let every = self.options.checkpoint_every;
            if every > 0 && summary.processed % every == 0 {
                self.store.save(results).await?;
                info!("Progress saved ({} items processed)", summary.processed);
            }

            tokio::time::sleep(self.options.request_delay).await;
        }
        Ok(())
    }

    /// 解析单个条目
    ///
    /// 导航失败或查询出错都记为未找到，不会中断批次
    pub async fn resolve_entity(&self, name: &str) -> ResolutionResult {
        let url = entity_page_url(&self.options.base_url, &self.options.page_path_prefix, name);
        info!("Scraping: {} ({})", name, url);

        let page = match self.renderer.render(&url).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Error scraping {}: {}", name, e);
                return ResolutionResult::NotFound;
            }
        };

        // Let dynamic content settle before querying
        tokio::time::sleep(self.options.settle_delay).await;

        let result = self.locator.find_image(page.as_ref(), name).await;
        match &result {
            ResolutionResult::ImageUrl(url) => info!("Success: {} -> {}", name, url),
            ResolutionResult::NotFound => info!("No valid image found for {}", name),
        }
        result
    }
}

fn panic_reason(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
