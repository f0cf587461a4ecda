// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use crate::engines::selectors::{default_strategies, SelectorStrategy};

/// 应用程序配置设置
///
/// 包含解析器、文件路径和浏览器等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 解析器配置
    pub resolver: ResolverSettings,
    /// 文件路径配置
    pub files: FileSettings,
    /// 浏览器配置
    pub browser: BrowserSettings,
}

/// 解析器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ResolverSettings {
    /// 目标站点根地址
    pub base_url: String,
    /// 条目页面路径前缀
    pub page_path_prefix: String,
    /// 原图存储路径
    pub image_storage_path: String,
    /// 页面导航后的等待时间（毫秒）
    pub settle_delay_ms: u64,
    /// 两个条目之间的间隔（毫秒）
    pub request_delay_ms: u64,
    /// 每个选择器策略的元素等待超时（毫秒）
    pub selector_timeout_ms: u64,
    /// 图片 HEAD 校验超时（秒）
    pub validation_timeout_secs: u64,
    /// 每处理多少个条目写一次检查点，0 表示只在开始和结束时写
    pub checkpoint_every: usize,
    /// 按优先级排列的选择器策略
    #[serde(default = "default_strategies")]
    pub strategies: Vec<SelectorStrategy>,
}

impl ResolverSettings {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn selector_timeout(&self) -> Duration {
        Duration::from_millis(self.selector_timeout_ms)
    }

    pub fn validation_timeout(&self) -> Duration {
        Duration::from_secs(self.validation_timeout_secs)
    }
}

/// 文件路径配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct FileSettings {
    /// 由 extract-catalog 生成的条目目录文件
    pub catalog: PathBuf,
    /// 检查点文件
    pub checkpoint: PathBuf,
    /// 手动覆盖文件（可选）
    pub overrides: Option<String>,
    /// 原始语言文件
    pub language_source: PathBuf,
    /// 下游源码文件（可选，空字符串表示禁用）
    pub handoff_target: Option<String>,
}

impl FileSettings {
    pub fn overrides_path(&self) -> Option<&Path> {
        non_empty_path(self.overrides.as_deref())
    }

    pub fn handoff_path(&self) -> Option<&Path> {
        non_empty_path(self.handoff_target.as_deref())
    }
}

fn non_empty_path(value: Option<&str>) -> Option<&Path> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(Path::new)
}

/// 浏览器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    /// 是否无头模式运行
    pub headless: bool,
    /// CDP 请求超时（秒）
    pub request_timeout_secs: u64,
    /// 远程调试地址，设置后连接已有的 Chrome 而不是启动新实例
    pub remote_debugging_url: Option<String>,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次叠加内置默认值、`config/default`、`config/{WIKIMG_ENVIRONMENT}`
    /// 和 `WIKIMG__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("WIKIMG_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("WIKIMG").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// 从单个显式文件加载配置，未设置的键使用默认值
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("resolver.base_url", "https://minecraft.wiki")?
            .set_default("resolver.page_path_prefix", "/w/")?
            .set_default("resolver.image_storage_path", "/w/images/")?
            .set_default("resolver.settle_delay_ms", 2000)?
            .set_default("resolver.request_delay_ms", 1000)?
            .set_default("resolver.selector_timeout_ms", 1500)?
            .set_default("resolver.validation_timeout_secs", 5)?
            .set_default("resolver.checkpoint_every", 5)?
            .set_default("files.catalog", "en_us_items.json")?
            .set_default("files.checkpoint", "minecraft_item_images.json")?
            .set_default("files.overrides", "overrides.json")?
            .set_default("files.language_source", "en_us.json")?
            .set_default("browser.headless", true)?
            .set_default("browser.request_timeout_secs", 30)
    }
}
