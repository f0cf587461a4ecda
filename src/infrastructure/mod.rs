// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施模块
///
/// 提供文件系统上的具体实现：条目目录、检查点存储和下游交接
pub mod catalog_file;
pub mod handoff;
pub mod storage;
