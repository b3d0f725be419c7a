// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::site::SiteId;

const BUILTIN_RULES: &str = include_str!("rules.yaml");

/// 规则表加载错误
#[derive(Error, Debug)]
pub enum RuleSetError {
    /// 规则文件读取失败
    #[error("Failed to read rule file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 规则文件格式错误
    #[error("Invalid rule table: {0}")]
    Parse(#[from] serde_yaml::Error),
    /// CSS 选择器无法解析
    #[error("Invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },
    /// 字段没有任何提取策略
    #[error("Empty {field} chain for {site}")]
    EmptyChain { site: SiteId, field: &'static str },
    /// 同一站点出现多次
    #[error("Duplicate rules for {0}")]
    Duplicate(SiteId),
    /// 受支持站点缺少规则
    #[error("No rules defined for {0}")]
    MissingSite(SiteId),
    /// 为 Unsupported 定义了规则
    #[error("Rules cannot target the Unsupported site")]
    UnsupportedTarget,
}

#[derive(Debug, Deserialize)]
struct RuleTableSpec {
    sites: Vec<SiteRulesSpec>,
}

#[derive(Debug, Deserialize)]
struct SiteRulesSpec {
    site: SiteId,
    source: String,
    price: Vec<StrategySpec>,
    image: Vec<StrategySpec>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StrategySpec {
    Concat { concat: Vec<ProbeSpec> },
    Probe(ProbeSpec),
}

#[derive(Debug, Deserialize)]
struct ProbeSpec {
    selector: String,
    #[serde(default)]
    attr: Option<String>,
}

/// 字段值来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSource {
    /// 元素的文本内容
    Text,
    /// 元素的指定属性
    Attr(String),
}

/// 单个选择器探针
///
/// 只看第一个匹配元素，读取其文本或属性并去除首尾空白
#[derive(Debug, Clone)]
pub struct Probe {
    selector: Selector,
    source: FieldSource,
}

impl Probe {
    /// 读取元素文本的探针
    pub fn text(selector: &str) -> Result<Self, RuleSetError> {
        Ok(Self {
            selector: parse_selector(selector)?,
            source: FieldSource::Text,
        })
    }

    /// 读取元素属性的探针
    pub fn attr(selector: &str, name: &str) -> Result<Self, RuleSetError> {
        Ok(Self {
            selector: parse_selector(selector)?,
            source: FieldSource::Attr(name.to_string()),
        })
    }

    fn from_spec(spec: ProbeSpec) -> Result<Self, RuleSetError> {
        match spec.attr {
            Some(name) => Self::attr(&spec.selector, &name),
            None => Self::text(&spec.selector),
        }
    }

    fn probe(&self, document: &Html) -> Option<String> {
        let element = document.select(&self.selector).next()?;
        non_empty(self.read(element))
    }

    fn read(&self, element: ElementRef<'_>) -> String {
        match &self.source {
            FieldSource::Text => element.text().collect::<String>(),
            FieldSource::Attr(name) => element
                .value()
                .attr(name)
                .map(str::to_string)
                .unwrap_or_default(),
        }
    }
}

/// 提取策略
#[derive(Debug, Clone)]
pub enum Strategy {
    /// 单个探针
    Single(Probe),
    /// 按顺序拼接多个探针的结果（例如整数部分、小数部分、货币符号分开渲染的价格）
    Concat(Vec<Probe>),
}

impl Strategy {
    fn from_spec(spec: StrategySpec) -> Result<Self, RuleSetError> {
        match spec {
            StrategySpec::Probe(probe) => Ok(Strategy::Single(Probe::from_spec(probe)?)),
            StrategySpec::Concat { concat } => Ok(Strategy::Concat(
                concat
                    .into_iter()
                    .map(Probe::from_spec)
                    .collect::<Result<Vec<_>, _>>()?,
            )),
        }
    }

    fn apply(&self, document: &Html) -> Option<String> {
        match self {
            Strategy::Single(probe) => probe.probe(document),
            Strategy::Concat(parts) => {
                let joined: String = parts.iter().filter_map(|p| p.probe(document)).collect();
                non_empty(joined)
            }
        }
    }
}

/// 字段规则：有序的回退策略链
///
/// 依次尝试每个策略，第一个非空结果获胜；全部落空时返回 `None`，不视为错误。
#[derive(Debug, Clone)]
pub struct FieldRule {
    strategies: Vec<Strategy>,
}

impl FieldRule {
    pub fn new(strategies: Vec<Strategy>) -> Self {
        Self { strategies }
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// 在已解析的文档上执行回退链
    pub fn resolve(&self, document: &Html) -> Option<String> {
        self.strategies.iter().find_map(|s| s.apply(document))
    }

    fn from_specs(
        site: SiteId,
        field: &'static str,
        specs: Vec<StrategySpec>,
    ) -> Result<Self, RuleSetError> {
        if specs.is_empty() {
            return Err(RuleSetError::EmptyChain { site, field });
        }
        let strategies = specs
            .into_iter()
            .map(Strategy::from_spec)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(strategies))
    }
}

/// 单个站点的提取规则
#[derive(Debug, Clone)]
pub struct SiteRules {
    pub site: SiteId,
    /// 返回给调用方的来源标签
    pub source_label: String,
    pub price: FieldRule,
    pub image: FieldRule,
}

/// 提取规则表
///
/// 进程启动时构建，运行期只读。新增站点只需增加一条表项。
#[derive(Debug, Clone)]
pub struct ExtractionRuleSet {
    sites: HashMap<SiteId, SiteRules>,
}

impl ExtractionRuleSet {
    /// 内置规则表
    pub fn builtin() -> Result<Self, RuleSetError> {
        Self::from_yaml(BUILTIN_RULES)
    }

    /// 从文件加载规则表，完全替换内置规则
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RuleSetError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| RuleSetError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&source)
    }

    /// 按配置加载：指定了路径则读文件，否则使用内置规则
    pub fn load(path: Option<&str>) -> Result<Self, RuleSetError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::builtin(),
        }
    }

    /// 解析 YAML 规则表并预编译所有选择器
    ///
    /// # 参数
    ///
    /// * `source` - YAML 文本
    ///
    /// # 返回值
    ///
    /// * `Ok(ExtractionRuleSet)` - 覆盖所有受支持站点的规则表
    /// * `Err(RuleSetError)` - 格式错误、选择器无效或站点缺失
    pub fn from_yaml(source: &str) -> Result<Self, RuleSetError> {
        let table: RuleTableSpec = serde_yaml::from_str(source)?;
        let mut sites = HashMap::new();

        for spec in table.sites {
            if !spec.site.is_supported() {
                return Err(RuleSetError::UnsupportedTarget);
            }
            if sites.contains_key(&spec.site) {
                return Err(RuleSetError::Duplicate(spec.site));
            }

            let rules = SiteRules {
                site: spec.site,
                source_label: spec.source,
                price: FieldRule::from_specs(spec.site, "price", spec.price)?,
                image: FieldRule::from_specs(spec.site, "image", spec.image)?,
            };
            sites.insert(spec.site, rules);
        }

        if let Some(missing) = SiteId::supported().find(|site| !sites.contains_key(site)) {
            return Err(RuleSetError::MissingSite(missing));
        }

        Ok(Self { sites })
    }

    pub fn get(&self, site: SiteId) -> Option<&SiteRules> {
        self.sites.get(&site)
    }
}

fn parse_selector(selector: &str) -> Result<Selector, RuleSetError> {
    Selector::parse(selector).map_err(|e| RuleSetError::Selector {
        selector: selector.to_string(),
        reason: format!("{:?}", e),
    })
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
