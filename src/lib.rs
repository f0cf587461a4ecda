// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含驱动解析批次的用例
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含条目目录、解析结果和检查点仓库接口
pub mod domain;

/// 引擎模块
///
/// 实现浏览器渲染、选择器策略和图片校验
pub mod engines;

/// 基础设施模块
///
/// 提供文件系统上的检查点、条目目录和下游交接实现
pub mod infrastructure;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;
