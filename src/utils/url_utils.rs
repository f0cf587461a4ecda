// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::{ParseError, Url};

/// 将可能为相对路径的URL转换为绝对路径URL
pub fn resolve_url(base_url: &Url, path: &str) -> Result<Url, ParseError> {
    base_url.join(path)
}

/// 条目页面地址
///
/// 站点根地址 + 固定前缀 + 原始条目名称；名称中的空格和下划线原样保留，不做转义
pub fn entity_page_url(base_url: &str, page_path_prefix: &str, entity_name: &str) -> String {
    format!(
        "{}/{}/{}",
        base_url.trim_end_matches('/'),
        page_path_prefix.trim_matches('/'),
        entity_name
    )
}
