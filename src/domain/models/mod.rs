// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// - 条目目录（catalog）：本次运行需要解析的条目名称快照
/// - 解析结果（resolution）：单个条目的图片地址或未找到标记，以及结果映射
pub mod catalog;
pub mod resolution;
