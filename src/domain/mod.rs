// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含图片解析的核心概念，包括：
/// - 领域模型（models）：条目目录、解析结果和结果映射
/// - 仓库接口（repositories）：检查点持久化抽象接口
/// - 服务（services）：条目目录过滤规则
///
/// 领域层不依赖浏览器或 HTTP 实现。
pub mod models;
pub mod repositories;
pub mod services;
