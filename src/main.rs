// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Context;
use std::sync::Arc;
use tracing::{error, info};
use wikimg::application::use_cases::resolve_images::{ResolveImagesUseCase, ResolveOptions};
use wikimg::config::settings::Settings;
use wikimg::engines::browser_engine::ChromiumRenderer;
use wikimg::engines::selectors::ImageLocator;
use wikimg::engines::validators::{HttpImageProbe, ImageValidator};
use wikimg::infrastructure::catalog_file::{self, CatalogError};
use wikimg::infrastructure::handoff;
use wikimg::infrastructure::storage::JsonCheckpointStore;
use wikimg::utils::telemetry;

/// 主函数
///
/// 加载条目目录，逐个解析图片，并把结果交给下游
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Wiki image resolver starting...");

    // 2. Load configuration
    let settings = Settings::new()?;
    info!("Output file: {}", settings.files.checkpoint.display());

    // 3. Load catalog; nothing has been scraped yet, so a missing file is fatal
    let catalog = match catalog_file::load_catalog(&settings.files.catalog).await {
        Ok(catalog) => catalog,
        Err(e @ CatalogError::Missing { .. }) => {
            error!("{}", e);
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("Failed to load catalog"),
    };
    info!("Items to scrape: {}", catalog.len());

    // 4. Initialize components
    let store = Arc::new(JsonCheckpointStore::new(
        &settings.files.checkpoint,
        settings.files.overrides_path().map(|p| p.to_path_buf()),
    ));
    let validator = ImageValidator::new(
        Arc::new(HttpImageProbe::new()?),
        settings.resolver.base_url.clone(),
        settings.resolver.image_storage_path.clone(),
        settings.resolver.validation_timeout(),
    );
    let locator = ImageLocator::new(
        settings.resolver.strategies.clone(),
        validator,
        settings.resolver.selector_timeout(),
    );
    let renderer = Arc::new(ChromiumRenderer::launch(&settings.browser).await?);

    // 5. Run until done or Ctrl-C
    let use_case = ResolveImagesUseCase::new(
        renderer,
        store.clone(),
        locator,
        ResolveOptions::from(&settings.resolver),
    );
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Unable to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    };
    let run_result = use_case.run(&catalog, shutdown).await;
    match &run_result {
        Ok(summary) if summary.interrupted => {
            info!("Run interrupted after {} items; progress saved", summary.processed);
        }
        Ok(_) => info!("Scraping completed"),
        Err(e) => error!("Run ended with an error: {}", e),
    }

    // 6. Hand whatever was saved to the downstream application, even after a failed run
    if let Some(target) = settings.files.handoff_path() {
        handoff::write_handoff(store.checkpoint_path(), target, handoff::DEFAULT_PREFIX)
            .await
            .with_context(|| format!("Failed to write {}", target.display()))?;
    }

    run_result?;
    Ok(())
}
