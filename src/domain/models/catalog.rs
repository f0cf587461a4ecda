// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashSet;

use crate::domain::models::resolution::EntityName;

/// 条目目录快照
///
/// 运行开始时构建一次，之后不可变。名称按来源顺序保存并去重。
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    names: Vec<EntityName>,
    index: HashSet<EntityName>,
}

impl Catalog {
    /// 从 `key -> 显示名称` 条目构建目录，只保留显示名称
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        V: Into<EntityName>,
    {
        Self::from_names(entries.into_iter().map(|(_, name)| name))
    }

    pub fn from_names<I, V>(names: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<EntityName>,
    {
        let mut catalog = Self::default();
        for name in names {
            let name = name.into();
            if catalog.index.insert(name.clone()) {
                catalog.names.push(name);
            }
        }
        catalog
    }

    pub fn names(&self) -> &[EntityName] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
