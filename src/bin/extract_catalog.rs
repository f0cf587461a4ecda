// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Context;
use tracing::{error, info};
use wikimg::config::settings::Settings;
use wikimg::domain::services::catalog_filter::CatalogFilter;
use wikimg::infrastructure::catalog_file::{self, CatalogError};
use wikimg::utils::telemetry;

/// 从语言文件生成条目目录
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_telemetry();

    let settings = Settings::new()?;
    let filter = CatalogFilter::minecraft()?;

    match catalog_file::extract_catalog(
        &settings.files.language_source,
        &settings.files.catalog,
        &filter,
    )
    .await
    {
        Ok(count) => {
            info!("Catalog ready with {} entries", count);
            Ok(())
        }
        Err(e @ CatalogError::Missing { .. }) => {
            error!("{}", e);
            std::process::exit(1);
        }
        Err(e) => Err(e).context("Failed to extract catalog"),
    }
}
