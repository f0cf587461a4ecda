// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 浏览器启动或连接失败
    #[error("Browser launch failed: {0}")]
    Launch(String),
    /// 页面导航失败
    #[error("Navigation failed: {0}")]
    Navigation(String),
    /// 超时
    #[error("Timeout")]
    Timeout,
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

/// 渲染引擎特质
///
/// 整个运行期间只持有一个浏览器会话，由编排器独占。
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// 导航到指定地址并返回页面句柄
    async fn render(&self, url: &str) -> Result<Box<dyn RenderedPage>, EngineError>;

    /// 释放浏览器资源，重复调用不报错
    async fn shutdown(&self) -> Result<(), EngineError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}

/// 已渲染页面
#[async_trait]
pub trait RenderedPage: Send + Sync {
    /// 在 `timeout` 内等待匹配 `selector` 的元素出现并读取其属性
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(value))` - 元素存在且属性存在
    /// * `Ok(None)` - 元素存在但没有该属性
    /// * `Err(EngineError::Timeout)` - 超时内没有匹配的元素
    async fn wait_for_attribute(
        &self,
        selector: &str,
        attribute: &str,
        timeout: Duration,
    ) -> Result<Option<String>, EngineError>;
}

/// HEAD 请求的响应摘要
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    /// HTTP状态码
    pub status_code: u16,
    /// 内容类型，缺失时为空字符串
    pub content_type: String,
}

/// 图片探测特质
///
/// 只取响应头，不下载内容
#[async_trait]
pub trait ImageProbe: Send + Sync {
    async fn head(&self, url: &str, timeout: Duration) -> Result<ProbeResponse, EngineError>;
}
