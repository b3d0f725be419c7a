// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use pricewatch::engines::traits::{BrowserDriver, BrowserPage, RenderError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 脚本化浏览器驱动
///
/// 每个页面都返回同一份 HTML；`failing` 模式下导航直接失败
pub struct MockBrowser {
    html: Option<String>,
    opened: AtomicUsize,
    closed: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockBrowser {
    pub fn serving(html: &str) -> Arc<Self> {
        Arc::new(Self {
            html: Some(html.to_string()),
            opened: AtomicUsize::new(0),
            closed: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            html: None,
            opened: AtomicUsize::new(0),
            closed: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn renders(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BrowserDriver for MockBrowser {
    async fn open_page(&self) -> Result<Box<dyn BrowserPage>, RenderError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockPage {
            html: self.html.clone(),
            closed: self.closed.clone(),
        }))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

struct MockPage {
    html: Option<String>,
    closed: Arc<AtomicUsize>,
}

#[async_trait]
impl BrowserPage for MockPage {
    async fn navigate(&mut self, url: &str) -> Result<(), RenderError> {
        match self.html {
            Some(_) => Ok(()),
            None => Err(RenderError::Navigation(format!(
                "net::ERR_CONNECTION_REFUSED at {}",
                url
            ))),
        }
    }

    async fn content(&mut self) -> Result<String, RenderError> {
        Ok(self.html.clone().unwrap_or_default())
    }

    async fn close(self: Box<Self>) -> Result<(), RenderError> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
