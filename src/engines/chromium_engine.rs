// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::BrowserSettings;
use crate::engines::traits::{BrowserDriver, BrowserPage, RenderError};
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::{Stream, StreamExt};
use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Chromium 启动选项
#[derive(Debug, Clone)]
pub struct ChromiumOptions {
    /// 远程调试地址，设置后连接已有实例而不是本地启动
    pub remote_debugging_url: Option<String>,
    pub headless: bool,
    /// 单条 CDP 请求超时
    pub request_timeout: Duration,
}

impl From<&BrowserSettings> for ChromiumOptions {
    fn from(settings: &BrowserSettings) -> Self {
        Self {
            remote_debugging_url: settings.remote_debugging_url.clone(),
            headless: settings.headless,
            request_timeout: settings.navigation_timeout(),
        }
    }
}

/// 浏览器会话槽
///
/// 保存当前共享的浏览器句柄及其连接存活标志。连接断开（处理任务退出）
/// 或被显式作废后，下一次获取会重新启动。启动在锁内进行，
/// 并发请求不会重复启动。
struct SessionSlot<T> {
    slot: Mutex<Option<Session<T>>>,
}

struct Session<T> {
    handle: Arc<T>,
    alive: Arc<AtomicBool>,
}

impl<T> SessionSlot<T> {
    fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    async fn acquire<F, Fut, E>(&self, launch: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(T, Arc<AtomicBool>), E>>,
    {
        let mut slot = self.slot.lock().await;

        if let Some(session) = slot.as_ref() {
            if session.alive.load(Ordering::SeqCst) {
                return Ok(session.handle.clone());
            }
            warn!("Browser connection lost, relaunching");
            *slot = None;
        }

        let (handle, alive) = launch().await?;
        let handle = Arc::new(handle);
        *slot = Some(Session {
            handle: handle.clone(),
            alive,
        });
        Ok(handle)
    }

    // Only drops the session if it is still the one the caller saw fail
    async fn invalidate(&self, stale: &Arc<T>) {
        let mut slot = self.slot.lock().await;
        if slot
            .as_ref()
            .is_some_and(|session| Arc::ptr_eq(&session.handle, stale))
        {
            *slot = None;
        }
    }

    async fn take(&self) -> Option<Arc<T>> {
        self.slot.lock().await.take().map(|session| session.handle)
    }
}

/// 驱动 CDP 事件流直到连接关闭，返回期间遇到的错误事件数
///
/// 单个事件出错（例如未知事件无法反序列化）不代表连接断开，继续轮询；
/// 只有事件流结束才把会话标记为失效。
async fn drive_handler<S, E>(mut handler: S, alive: Arc<AtomicBool>) -> usize
where
    S: Stream<Item = Result<(), E>> + Unpin,
    E: Display,
{
    let mut errors = 0;
    while let Some(event) = handler.next().await {
        if let Err(e) = event {
            errors += 1;
            let message = e.to_string();
            if message.contains("data did not match any variant") {
                debug!("Ignoring undecodable CDP event: {}", message);
            } else {
                warn!("Browser handler error: {}", message);
            }
        }
    }

    alive.store(false, Ordering::SeqCst);
    warn!("Browser connection closed");
    errors
}

/// Chromium 驱动
///
/// 基于 chromiumoxide，整个进程共享一个懒启动的浏览器实例，
/// 每次请求只打开和关闭自己的页面。浏览器崩溃或连接断开后自动重启。
pub struct ChromiumDriver {
    options: ChromiumOptions,
    session: SessionSlot<Browser>,
}

impl ChromiumDriver {
    pub fn new(options: ChromiumOptions) -> Self {
        Self {
            options,
            session: SessionSlot::new(),
        }
    }

    async fn launch(&self) -> Result<(Browser, Arc<AtomicBool>), RenderError> {
        let (browser, handler) = if let Some(ref url) = self.options.remote_debugging_url {
            info!("Connecting to remote Chrome instance at: {}", url);
            Browser::connect(url)
                .await
                .map_err(|e| RenderError::Launch(format!("Failed to connect to remote Chrome: {}", e)))?
        } else {
            let mut builder = BrowserConfig::builder()
                .no_sandbox()
                .request_timeout(self.options.request_timeout);

            if !self.options.headless {
                builder = builder.with_head();
            }

            builder = builder.arg("--disable-gpu").arg("--disable-dev-shm-usage");

            let config = builder.build().map_err(RenderError::Launch)?;
            info!("Launching headless Chromium");
            Browser::launch(config)
                .await
                .map_err(|e| RenderError::Launch(e.to_string()))?
        };

        // Pages stall if nobody polls the handler
        let alive = Arc::new(AtomicBool::new(true));
        tokio::spawn(drive_handler(handler, alive.clone()));

        Ok((browser, alive))
    }
}

#[async_trait]
impl BrowserDriver for ChromiumDriver {
    async fn open_page(&self) -> Result<Box<dyn BrowserPage>, RenderError> {
        let browser = self.session.acquire(|| self.launch()).await?;

        match browser.new_page("about:blank").await {
            Ok(page) => Ok(Box::new(ChromiumPage { page })),
            Err(e) => {
                // The next request relaunches instead of reusing a broken browser
                self.session.invalidate(&browser).await;
                Err(RenderError::Navigation(format!("Failed to open page: {}", e)))
            }
        }
    }

    async fn shutdown(&self) -> Result<(), RenderError> {
        let Some(browser) = self.session.take().await else {
            return Ok(());
        };

        // A remote browser belongs to someone else; just drop the connection
        if self.options.remote_debugging_url.is_some() {
            return Ok(());
        }

        let Ok(mut browser) = Arc::try_unwrap(browser) else {
            warn!("Pages still open at shutdown; dropping browser handle");
            return Ok(());
        };

        browser
            .close()
            .await
            .map_err(|e| RenderError::Launch(format!("Failed to close browser: {}", e)))?;
        if let Err(e) = browser.wait().await {
            warn!("Failed to reap browser process: {}", e);
        }
        info!("Browser closed");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "chromium"
    }
}

/// 单个 Chromium 页面
struct ChromiumPage {
    page: Page,
}

#[async_trait]
impl BrowserPage for ChromiumPage {
    // goto resolves once the load event fired, which implies DOMContentLoaded
    async fn navigate(&mut self, url: &str) -> Result<(), RenderError> {
        self.page
            .goto(url)
            .await
            .map_err(|e| RenderError::Navigation(e.to_string()))?;
        Ok(())
    }

    async fn content(&mut self) -> Result<String, RenderError> {
        self.page
            .content()
            .await
            .map_err(|e| RenderError::Capture(e.to_string()))
    }

    async fn close(self: Box<Self>) -> Result<(), RenderError> {
        self.page
            .close()
            .await
            .map_err(|e| RenderError::Capture(format!("Failed to close page: {}", e)))
    }
}
