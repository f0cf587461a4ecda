// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::Path;
use tokio::fs;
use tracing::info;

/// 下游 TypeScript 模块的声明前缀
pub const DEFAULT_PREFIX: &str = "import type { ItemsToImageUrl } from \"./item_helper\";\nexport const ITEMS_TO_IMAGE_URLS: ItemsToImageUrl = ";

/// 把检查点内容包装为静态类型常量并写入下游源码文件
pub async fn write_handoff(checkpoint: &Path, target: &Path, prefix: &str) -> std::io::Result<()> {
    let data = fs::read_to_string(checkpoint).await?;
    let mut module = String::with_capacity(prefix.len() + data.len() + 1);
    module.push_str(prefix);
    module.push_str(&data);
    module.push('\n');
    fs::write(target, module).await?;

    info!("Copied results to {}", target.display());
    Ok(())
}
