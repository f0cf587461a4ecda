// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::settings::BrowserSettings;
use crate::engines::traits::{EngineError, PageRenderer, RenderedPage};
use crate::utils::url_utils::resolve_url;

/// 元素等待的轮询间隔
const POLL_INTERVAL: Duration = Duration::from_millis(100);

const HIDE_WEBDRIVER: &str =
    "Object.defineProperty(navigator, 'webdriver', {get: () => undefined})";

/// 基于 chromiumoxide 的渲染引擎
///
/// 持有唯一的浏览器会话和一个复用的标签页
pub struct ChromiumRenderer {
    browser: Mutex<Option<Browser>>,
    handler: Mutex<Option<JoinHandle<()>>>,
    page: Page,
    remote: bool,
}

impl ChromiumRenderer {
    /// 启动本地 Chrome，或在配置了远程调试地址时连接已有实例
    pub async fn launch(settings: &BrowserSettings) -> Result<Self, EngineError> {
        let remote_url = settings
            .remote_debugging_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty());

        let (browser, mut handler) = if let Some(url) = remote_url {
            info!("Connecting to remote Chrome instance at: {}", url);
            Browser::connect(url)
                .await
                .map_err(|e| EngineError::Launch(format!("Failed to connect to remote Chrome: {}", e)))?
        } else {
            let mut builder = BrowserConfig::builder()
                .no_sandbox()
                .request_timeout(Duration::from_secs(settings.request_timeout_secs))
                .arg("--disable-gpu")
                .arg("--disable-dev-shm-usage")
                .arg("--disable-blink-features=AutomationControlled");
            if !settings.headless {
                builder = builder.with_head();
            }

            Browser::launch(builder.build().map_err(EngineError::Launch)?)
                .await
                .map_err(|e| EngineError::Launch(e.to_string()))?
        };

        // Drive the CDP event stream for the lifetime of the browser
        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| EngineError::Launch(e.to_string()))?;
        page.evaluate_on_new_document(AddScriptToEvaluateOnNewDocumentParams::new(HIDE_WEBDRIVER))
            .await
            .map_err(|e| EngineError::Launch(e.to_string()))?;

        info!("Browser session ready");
        Ok(Self {
            browser: Mutex::new(Some(browser)),
            handler: Mutex::new(Some(handler_task)),
            page,
            remote: remote_url.is_some(),
        })
    }
}

#[async_trait]
impl PageRenderer for ChromiumRenderer {
    async fn render(&self, url: &str) -> Result<Box<dyn RenderedPage>, EngineError> {
        self.page
            .goto(url)
            .await
            .map_err(|e| EngineError::Navigation(format!("{}: {}", url, e)))?;

        Ok(Box::new(ChromiumPage {
            page: self.page.clone(),
        }))
    }

    async fn shutdown(&self) -> Result<(), EngineError> {
        if let Some(mut browser) = self.browser.lock().await.take() {
            // A remote browser belongs to someone else; only drop the connection
            if !self.remote {
                if let Err(e) = browser.close().await {
                    warn!("Failed to close browser cleanly: {}", e);
                }
                browser
                    .wait()
                    .await
                    .map_err(|e| EngineError::Other(format!("Failed to reap browser process: {}", e)))?;
            }
            info!("Browser closed");
        }

        if let Some(handler) = self.handler.lock().await.take() {
            handler.abort();
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "chromium"
    }
}

/// chromiumoxide 页面句柄
struct ChromiumPage {
    page: Page,
}

#[async_trait]
impl RenderedPage for ChromiumPage {
    async fn wait_for_attribute(
        &self,
        selector: &str,
        attribute: &str,
        timeout: Duration,
    ) -> Result<Option<String>, EngineError> {
        let element = tokio::time::timeout(timeout, async {
            loop {
                if let Ok(element) = self.page.find_element(selector).await {
                    return element;
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        })
        .await
        .map_err(|_| EngineError::Timeout)?;

        let value = element
            .attribute(attribute)
            .await
            .map_err(|e| EngineError::Other(format!("Failed to read {}: {}", attribute, e)))?;

        let Some(value) = value else {
            return Ok(None);
        };

        // Report absolute URLs, the same way the DOM `src` property does
        let page_url = self.page.url().await.ok().flatten();
        match page_url.as_deref().map(Url::parse) {
            Some(Ok(base)) => match resolve_url(&base, &value) {
                Ok(resolved) => Ok(Some(resolved.to_string())),
                Err(e) => {
                    debug!("Could not resolve {} against {}: {}", value, base, e);
                    Ok(Some(value))
                }
            },
            _ => Ok(Some(value)),
        }
    }
}
