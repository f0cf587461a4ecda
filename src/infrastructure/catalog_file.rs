// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{info, warn};

use crate::domain::models::catalog::Catalog;
use crate::domain::services::catalog_filter::CatalogFilter;

/// 条目目录错误类型
#[derive(Error, Debug)]
pub enum CatalogError {
    /// 输入文件不存在
    #[error("{} not found. {}", .path.display(), .hint)]
    Missing { path: PathBuf, hint: &'static str },
    /// IO错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// 解析错误
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// 过滤模式无效
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub const CATALOG_HINT: &str =
    "Please run `extract-catalog` before running the resolver to generate the item catalog.";

pub const LANGUAGE_HINT: &str =
    "Please place the language file (en_us.json) at the configured path and try again.";

async fn read_mapping(path: &Path, hint: &'static str) -> Result<Map<String, Value>, CatalogError> {
    let data = match fs::read(path).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(CatalogError::Missing {
                path: path.to_path_buf(),
                hint,
            })
        }
        Err(e) => return Err(e.into()),
    };
    Ok(serde_json::from_slice(&data)?)
}

/// 加载条目目录文件，条目名称为文件中的值，保持文件顺序
pub async fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let mapping = read_mapping(path, CATALOG_HINT).await?;
    let entries = mapping.into_iter().filter_map(|(key, value)| match value {
        Value::String(name) => Some((key, name)),
        other => {
            warn!("Skipping catalog entry {} with non-string value {}", key, other);
            None
        }
    });
    let catalog = Catalog::from_entries(entries);
    info!("Loaded {} entities from {}", catalog.len(), path.display());
    Ok(catalog)
}

/// 从语言文件生成条目目录文件
///
/// # 参数
///
/// * `source` - 语言文件路径
/// * `target` - 输出的目录文件路径
/// * `filter` - 过滤规则
///
/// # 返回值
///
/// 写入的条目数量
pub async fn extract_catalog(
    source: &Path,
    target: &Path,
    filter: &CatalogFilter,
) -> Result<usize, CatalogError> {
    let language = read_mapping(source, LANGUAGE_HINT).await?;
    let entries = filter.apply(
        language
            .iter()
            .filter_map(|(key, value)| value.as_str().map(|name| (key.as_str(), name))),
    );

    let output: Map<String, Value> = entries
        .into_iter()
        .map(|(key, name)| (key, Value::String(name)))
        .collect();

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    output.serialize(&mut serializer)?;
    fs::write(target, buf).await?;

    info!(
        "Wrote {} of {} language entries to {}",
        output.len(),
        language.len(),
        target.display()
    );
    Ok(output.len())
}
