// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// 渲染错误类型
#[derive(Error, Debug)]
pub enum RenderError {
    /// 浏览器启动或连接失败
    #[error("Browser launch failed: {0}")]
    Launch(String),
    /// 页面打开或导航失败
    #[error("Navigation failed: {0}")]
    Navigation(String),
    /// 导航超时
    #[error("Navigation timed out after {0:?}")]
    Timeout(Duration),
    /// 读取页面内容失败
    #[error("Failed to capture page content: {0}")]
    Capture(String),
    /// 渲染池已满且排队超时
    #[error("Render pool busy: all {0} slots in use")]
    Busy(usize),
    /// 渲染池已关闭
    #[error("Render pool is shut down")]
    PoolClosed,
}

/// 浏览器驱动特质
///
/// 对无头浏览器的最小抽象：打开一个页面、导航、取回 HTML、关闭。
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// 打开一个只服务于单次请求的新页面
    async fn open_page(&self) -> Result<Box<dyn BrowserPage>, RenderError>;

    /// 关闭浏览器进程或断开连接
    async fn shutdown(&self) -> Result<(), RenderError> {
        Ok(())
    }

    /// 驱动名称
    fn name(&self) -> &'static str;
}

/// 浏览器页面特质
#[async_trait]
pub trait BrowserPage: Send {
    /// 导航到目标地址，至少等待 DOMContentLoaded
    async fn navigate(&mut self, url: &str) -> Result<(), RenderError>;

    /// 读取当前完整的 HTML
    async fn content(&mut self) -> Result<String, RenderError>;

    /// 释放页面
    async fn close(self: Box<Self>) -> Result<(), RenderError>;
}
