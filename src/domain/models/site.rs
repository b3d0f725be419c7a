// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 受支持的站点标识
///
/// 仅通过 URL 子串匹配得出，无状态、无生命周期。
/// `Unsupported` 是终止状态，调用方不得为其发起渲染。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SiteId {
    MediaMarkt,
    Amazon,
    #[serde(rename = "PCComponentes")]
    PCComponentes,
    Unsupported,
}

/// 站点识别令牌，按顺序匹配
///
/// 顺序是契约的一部分：包含多个令牌的 URL（例如跳转包装链接）
/// 归属于第一个命中的站点，即 MediaMarkt、Amazon、PCComponentes。
const SITE_TOKENS: [(&str, SiteId); 3] = [
    ("mediamarkt", SiteId::MediaMarkt),
    ("amazon", SiteId::Amazon),
    ("pccomponentes", SiteId::PCComponentes),
];

impl SiteId {
    /// 将 URL 归类到已知站点
    ///
    /// 大小写敏感的子串匹配，不访问网络，没有副作用。
    ///
    /// # 参数
    ///
    /// * `url` - 原始请求 URL
    ///
    /// # 返回值
    ///
    /// 命中的站点标识；没有命中任何令牌时返回 `SiteId::Unsupported`
    pub fn classify(url: &str) -> SiteId {
        SITE_TOKENS
            .iter()
            .find(|(token, _)| url.contains(token))
            .map(|(_, site)| *site)
            .unwrap_or(SiteId::Unsupported)
    }

    /// 所有受支持的站点（不含 `Unsupported`）
    pub fn supported() -> impl Iterator<Item = SiteId> {
        SITE_TOKENS.iter().map(|(_, site)| *site)
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, SiteId::Unsupported)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SiteId::MediaMarkt => "MediaMarkt",
            SiteId::Amazon => "Amazon",
            SiteId::PCComponentes => "PCComponentes",
            SiteId::Unsupported => "Unsupported",
        }
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
