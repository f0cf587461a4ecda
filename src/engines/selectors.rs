// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::models::resolution::ResolutionResult;
use crate::engines::traits::{EngineError, RenderedPage};
use crate::engines::validators::ImageValidator;

/// 读取图片地址的属性
const IMAGE_SOURCE_ATTRIBUTE: &str = "src";

/// 模板中的条目名称占位符
const NAME_PLACEHOLDER: &str = "{}";

/// 图片元素查找策略
///
/// 策略按配置顺序依次尝试，第一个通过校验的结果即为最终结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectorStrategy {
    /// 固定的 CSS 选择器
    CssSelector { template: String },
    /// 以条目名称参数化的属性匹配选择器，`{}` 会被替换为条目名称
    AttributeMatch { template: String },
}

impl SelectorStrategy {
    /// 生成针对某个条目的实际选择器
    pub fn selector_for(&self, entity_name: &str) -> String {
        match self {
            SelectorStrategy::CssSelector { template } => template.clone(),
            SelectorStrategy::AttributeMatch { template } => {
                let name = escape_css_string(&entity_name.replace('_', " "));
                template.replace(NAME_PLACEHOLDER, &name)
            }
        }
    }

    /// 在页面上执行该策略，返回元素的图片地址
    pub async fn query(
        &self,
        page: &dyn RenderedPage,
        entity_name: &str,
        timeout: Duration,
    ) -> Result<Option<String>, EngineError> {
        let selector = self.selector_for(entity_name);
        page.wait_for_attribute(&selector, IMAGE_SOURCE_ATTRIBUTE, timeout)
            .await
    }
}

/// 目标 wiki 的默认策略：普通信息框、被重定向提示下移的信息框、按 alt 文本匹配
pub fn default_strategies() -> Vec<SelectorStrategy> {
    vec![
        SelectorStrategy::CssSelector {
            template: "#mw-content-text>div:first-child>div:first-child>div:nth-child(2)>div:first-child>span:first-child>a:first-child>img".to_string(),
        },
        SelectorStrategy::CssSelector {
            template: "#mw-content-text>div:first-child>div:nth-child(2)>div:nth-child(2)>div:first-child>span:first-child>a:first-child>img".to_string(),
        },
        SelectorStrategy::AttributeMatch {
            template: "img[alt*=\"{}\"]".to_string(),
        },
    ]
}

fn escape_css_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// 单个策略的查找结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// 通过校验的图片地址
    Found(String),
    /// 元素不存在、没有图片地址或地址未通过校验
    NotFound,
    /// 查询过程中出现的非超时错误
    TransientError(String),
}

/// 选择器解析引擎
///
/// 严格按顺序逐个尝试策略，不并行，找到第一个有效结果后立即返回
#[derive(Clone)]
pub struct ImageLocator {
    strategies: Vec<SelectorStrategy>,
    validator: ImageValidator,
    selector_timeout: Duration,
}

impl ImageLocator {
    pub fn new(
        strategies: Vec<SelectorStrategy>,
        validator: ImageValidator,
        selector_timeout: Duration,
    ) -> Self {
        Self {
            strategies,
            validator,
            selector_timeout,
        }
    }

    /// 执行单个策略并校验结果
    pub async fn lookup(
        &self,
        page: &dyn RenderedPage,
        entity_name: &str,
        strategy: &SelectorStrategy,
    ) -> LookupOutcome {
        match strategy
            .query(page, entity_name, self.selector_timeout)
            .await
        {
            Ok(Some(src)) => {
                if self.validator.validate(&src).await {
                    LookupOutcome::Found(src)
                } else {
                    debug!("Invalid image URL: {}", src);
                    LookupOutcome::NotFound
                }
            }
            Ok(None) => {
                debug!("Element has no {} attribute", IMAGE_SOURCE_ATTRIBUTE);
                LookupOutcome::NotFound
            }
            Err(EngineError::Timeout) => LookupOutcome::NotFound,
            Err(e) => LookupOutcome::TransientError(e.to_string()),
        }
    }

    /// 在页面上查找条目图片
    ///
    /// # 参数
    ///
    /// * `page` - 已渲染的条目页面
    /// * `entity_name` - 条目名称
    ///
    /// # 返回值
    ///
    /// 第一个通过校验的图片地址；所有策略都失败时返回 `NotFound`，这是正常结果
    pub async fn find_image(&self, page: &dyn RenderedPage, entity_name: &str) -> ResolutionResult {
        let total = self.strategies.len();
        for (i, strategy) in self.strategies.iter().enumerate() {
            let selector = strategy.selector_for(entity_name);
            debug!(
                "Trying selector {}/{}: {}",
                i + 1,
                total,
                selector.chars().take(50).collect::<String>()
            );

            match self.lookup(page, entity_name, strategy).await {
                LookupOutcome::Found(url) => {
                    info!("Found valid image for {}: {}", entity_name, url);
                    return ResolutionResult::ImageUrl(url);
                }
                LookupOutcome::NotFound => debug!("Selector {}/{} failed", i + 1, total),
                LookupOutcome::TransientError(reason) => {
                    warn!("Error with selector {}/{}: {}", i + 1, total, reason)
                }
            }
        }
        ResolutionResult::NotFound
    }
}
