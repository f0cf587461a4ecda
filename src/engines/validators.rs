// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;
use url::Url;

use crate::engines::traits::{EngineError, ImageProbe, ProbeResponse};

/// MediaWiki 缩略图目录标记
const THUMB_MARKER: &str = "/thumb/";

const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".webp"];

/// 规范化候选图片地址
///
/// 去掉查询参数；如果路径位于缩略图目录且不以已知图片扩展名结尾，
/// 取缩略图标记之后的第一个路径段作为原图文件名，拼接到站点原图存储路径上。
///
/// # 参数
///
/// * `candidate` - 页面元素上读到的图片地址，必须是绝对地址
/// * `base_url` - 站点根地址
/// * `image_storage_path` - 原图存储路径，例如 `/w/images/`
pub fn normalize_candidate(
    candidate: &str,
    base_url: &str,
    image_storage_path: &str,
) -> Result<String, url::ParseError> {
    let mut url = Url::parse(candidate)?;
    url.set_query(None);

    let path = url.path();
    if path.contains(THUMB_MARKER) && !has_image_extension(path) {
        if let Some((_, rest)) = path.split_once(THUMB_MARKER) {
            let original = rest.split('/').next().unwrap_or_default();
            return Ok(format!(
                "{}/{}/{}",
                base_url.trim_end_matches('/'),
                image_storage_path.trim_matches('/'),
                original
            ));
        }
    }

    Ok(url.to_string())
}

// Case-sensitive: `Foo.PNG` thumbnails are rewritten like extension-less ones
fn has_image_extension(path: &str) -> bool {
    IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// 基于 reqwest 的 HEAD 探测
///
/// 不跟随重定向，只有直接返回 200 的地址才算可用
pub struct HttpImageProbe {
    client: reqwest::Client,
}

impl HttpImageProbe {
    pub fn new() -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (compatible; wikimg/0.1)")
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageProbe for HttpImageProbe {
    async fn head(&self, url: &str, timeout: Duration) -> Result<ProbeResponse, EngineError> {
        let response = self.client.head(url).timeout(timeout).send().await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        Ok(ProbeResponse {
            status_code: response.status().as_u16(),
            content_type,
        })
    }
}

/// 图片地址校验器
///
/// 任何传输错误、超时或格式错误的地址都视为拒绝，不会向调用方抛出
#[derive(Clone)]
pub struct ImageValidator {
    probe: Arc<dyn ImageProbe>,
    base_url: String,
    image_storage_path: String,
    timeout: Duration,
}

impl ImageValidator {
    pub fn new(
        probe: Arc<dyn ImageProbe>,
        base_url: impl Into<String>,
        image_storage_path: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            probe,
            base_url: base_url.into(),
            image_storage_path: image_storage_path.into(),
            timeout,
        }
    }

    pub fn normalize(&self, candidate: &str) -> Result<String, url::ParseError> {
        normalize_candidate(candidate, &self.base_url, &self.image_storage_path)
    }

    /// 校验候选地址是否可以直接获取到图片
    ///
    /// # 返回值
    ///
    /// 状态码为 200 且内容类型以 `image/` 开头时返回 true
    pub async fn validate(&self, candidate: &str) -> bool {
        let target = match self.normalize(candidate) {
            Ok(target) => target,
            Err(e) => {
                debug!("Rejecting malformed image URL {}: {}", candidate, e);
                return false;
            }
        };

        match self.probe.head(&target, self.timeout).await {
            Ok(response) => {
                let accepted =
                    response.status_code == 200 && response.content_type.starts_with("image/");
                if !accepted {
                    debug!(
                        "Rejecting {}: status={} content-type={:?}",
                        target, response.status_code, response.content_type
                    );
                }
                accepted
            }
            Err(e) => {
                debug!("HEAD check failed for {}: {}", target, e);
                false
            }
        }
    }
}
