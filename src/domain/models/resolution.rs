// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::models::catalog::Catalog;

/// 条目显示名称，同时作为页面查找键和结果映射键
pub type EntityName = String;

/// 单个条目的解析结果
///
/// 持久化时图片地址写为字符串，未找到写为 `false`。
/// 未找到同样会被记录，下一次运行不会重试该条目。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredValue", into = "StoredValue")]
pub enum ResolutionResult {
    /// 已校验的图片地址
    ImageUrl(String),
    /// 没有任何策略得到可用的图片
    NotFound,
}

impl ResolutionResult {
    pub fn is_found(&self) -> bool {
        matches!(self, ResolutionResult::ImageUrl(_))
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum StoredValue {
    Url(String),
    Flag(bool),
}

impl From<ResolutionResult> for StoredValue {
    fn from(result: ResolutionResult) -> Self {
        match result {
            ResolutionResult::ImageUrl(url) => StoredValue::Url(url),
            ResolutionResult::NotFound => StoredValue::Flag(false),
        }
    }
}

impl TryFrom<StoredValue> for ResolutionResult {
    type Error = String;

    fn try_from(value: StoredValue) -> Result<Self, Self::Error> {
        match value {
            StoredValue::Url(url) => Ok(ResolutionResult::ImageUrl(url)),
            StoredValue::Flag(false) => Ok(ResolutionResult::NotFound),
            StoredValue::Flag(true) => Err("`true` is not a valid resolution result".to_string()),
        }
    }
}

/// 条目名称到解析结果的映射
///
/// 每个名称至多一条记录；键有序存储，保证相同内容序列化后完全一致。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultMap(BTreeMap<EntityName, ResolutionResult>);

impl ResultMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ResolutionResult> {
        self.0.get(name)
    }

    /// 记录一个条目的结果，返回被替换的旧值
    pub fn record(&mut self, name: impl Into<EntityName>, result: ResolutionResult) -> Option<ResolutionResult> {
        self.0.insert(name.into(), result)
    }

    /// 用覆盖映射合并当前映射，键冲突时覆盖项优先
    pub fn merge_overrides(&mut self, overrides: ResultMap) {
        self.0.extend(overrides.0);
    }

    /// 删除所有不在当前目录中的键
    ///
    /// # 返回值
    ///
    /// 被删除的键，按字典序排列
    pub fn cull(&mut self, catalog: &Catalog) -> Vec<EntityName> {
        let stale: Vec<EntityName> = self
            .0
            .keys()
            .filter(|name| !catalog.contains(name))
            .cloned()
            .collect();
        for name in &stale {
            self.0.remove(name);
        }
        stale
    }

    pub fn succeeded(&self) -> usize {
        self.0.values().filter(|r| r.is_found()).count()
    }

    pub fn failed(&self) -> usize {
        self.0.len() - self.succeeded()
    }
}

impl FromIterator<(EntityName, ResolutionResult)> for ResultMap {
    fn from_iter<T: IntoIterator<Item = (EntityName, ResolutionResult)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
