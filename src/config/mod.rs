// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理解析器的配置设置，包括目标站点、文件路径、浏览器与选择器策略
pub mod settings;
