// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 提供从语言文件推导条目目录的过滤规则
pub mod catalog_filter;
