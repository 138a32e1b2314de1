//! 链接解析核心
//!
//! 请求路径 → 精确匹配 → 逐级缩短前缀匹配 → 模板替换 → 访问授权 → 重定向。
//! 常见路径（静态、非 secure 链接）只产生一次按 slug 索引的查询。

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, error, trace};

use crate::analytics::{CaptureLimits, ClickEvent, ClickRecorder, ClientInfo};
use crate::config::{ClickConfig, ResolverConfig};
use crate::errors::{GolinkError, Result};
use crate::metrics_core::{MetricsRecorder, ResolutionOutcome};
use crate::services::template::UrlTemplate;
use crate::services::visibility::{AccessDecision, AccessPolicy};
use crate::storage::{Identity, Link, LinkRepository};
use crate::utils::{is_valid_slug_path, split_path_segments};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Redirect(String),
    NotFound,
    RequireLogin,
    Forbidden,
}

/// Everything the resolver reads from configuration, passed in explicitly.
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    pub lookup_timeout: Duration,
    pub max_segments: usize,
    pub admin_users: Vec<String>,
    pub capture_limits: CaptureLimits,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            lookup_timeout: Duration::from_millis(2000),
            max_segments: 16,
            admin_users: Vec::new(),
            capture_limits: CaptureLimits::default(),
        }
    }
}

impl ResolverSettings {
    pub fn from_config(resolver: &ResolverConfig, clicks: &ClickConfig) -> Self {
        Self {
            lookup_timeout: Duration::from_millis(resolver.lookup_timeout_ms),
            max_segments: resolver.max_segments,
            admin_users: resolver.admin_users.clone(),
            capture_limits: CaptureLimits::from(clicks),
        }
    }
}

pub struct ResolverCore {
    repo: Arc<dyn LinkRepository>,
    clicks: ClickRecorder,
    metrics: Arc<dyn MetricsRecorder>,
    policy: AccessPolicy,
    settings: ResolverSettings,
}

impl ResolverCore {
    pub fn new(
        repo: Arc<dyn LinkRepository>,
        clicks: ClickRecorder,
        metrics: Arc<dyn MetricsRecorder>,
        settings: ResolverSettings,
    ) -> Self {
        let policy = AccessPolicy::new(settings.admin_users.iter().cloned());
        Self {
            repo,
            clicks,
            metrics,
            policy,
            settings,
        }
    }

    /// 解析请求路径（原始路径，各段尚未百分号解码）
    ///
    /// 存储层错误（含查询超时）以 `Err` 返回，调用方不得重定向。
    /// 指标中的 `found` 表示匹配到链接且模板可用，RequireLogin / Forbidden 同样计入。
    pub async fn resolve(
        &self,
        path: &str,
        identity: Option<&Identity>,
        client: &ClientInfo,
    ) -> Result<Resolution> {
        let start = Instant::now();
        let result = self.resolve_inner(path, identity, client).await;

        let outcome = match &result {
            Ok((matched, _)) if *matched => ResolutionOutcome::Found,
            Ok(_) => ResolutionOutcome::NotFound,
            Err(_) => ResolutionOutcome::Error,
        };
        self.metrics.inc_resolution(outcome);
        self.metrics
            .observe_resolution_duration(start.elapsed().as_secs_f64());

        result.map(|(_, resolution)| resolution)
    }

    /// 返回 (是否匹配到链接, 解析结果)
    async fn resolve_inner(
        &self,
        path: &str,
        identity: Option<&Identity>,
        client: &ClientInfo,
    ) -> Result<(bool, Resolution)> {
        let segments = split_path_segments(path);
        if segments.is_empty() {
            trace!("Path '{}' has no segments, not resolvable", path);
            return Ok((false, Resolution::NotFound));
        }

        let Some((link, remainder)) = self.find_longest_match(&segments).await? else {
            debug!("No link matches path '{}'", path);
            return Ok((false, Resolution::NotFound));
        };

        let args: Vec<&str> = remainder.iter().map(String::as_str).collect();
        let destination = match UrlTemplate::parse(&link.url_template)
            .and_then(|t| t.render(&args))
        {
            Ok(url) => url,
            Err(e) => {
                // 模板错误与“链接不存在”对外不可区分
                debug!("Template of link '{}' not applicable: {}", link.slug, e);
                return Ok((false, Resolution::NotFound));
            }
        };

        let decision = tokio::time::timeout(
            self.settings.lookup_timeout,
            self.policy.authorize(&*self.repo, &link, identity),
        )
        .await
        .map_err(GolinkError::from)
        .and_then(|r| r)
        .inspect_err(|e| error!("Authorization lookup failed for '{}': {}", link.slug, e))?;

        let resolution = match decision {
            AccessDecision::Allow => {
                if client.head_request {
                    trace!("HEAD request for '{}', click not recorded", link.slug);
                } else {
                    self.clicks.record(ClickEvent::capture(
                        link.id,
                        identity.map(|i| i.id),
                        client,
                        self.settings.capture_limits,
                        Utc::now(),
                    ));
                }
                Resolution::Redirect(destination)
            }
            AccessDecision::RequireLogin => Resolution::RequireLogin,
            AccessDecision::Deny => Resolution::Forbidden,
        };
        Ok((true, resolution))
    }

    /// 先精确匹配完整路径，再依次尝试更短的前缀
    ///
    /// 最多 `max_segments` 段参与匹配，其余段全部作为剩余参数。
    async fn find_longest_match<'s>(
        &self,
        segments: &'s [String],
    ) -> Result<Option<(Link, &'s [String])>> {
        let longest = segments.len().min(self.settings.max_segments);
        for len in (1..=longest).rev() {
            let prefix = &segments[..len];
            // 解码出 `/` 的段只能作为参数
            if prefix.iter().any(|s| s.contains('/')) {
                continue;
            }
            let candidate = prefix.join("/");
            if !is_valid_slug_path(&candidate) {
                continue;
            }

            if let Some(link) = self.lookup(&candidate).await? {
                trace!(
                    "Matched slug '{}' with {} remaining segment(s)",
                    candidate,
                    segments.len() - len
                );
                return Ok(Some((link, &segments[len..])));
            }
        }
        Ok(None)
    }

    async fn lookup(&self, slug: &str) -> Result<Option<Link>> {
        match tokio::time::timeout(
            self.settings.lookup_timeout,
            self.repo.find_link_by_slug(slug),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => {
                error!(
                    "Lookup of '{}' exceeded {:?}",
                    slug, self.settings.lookup_timeout
                );
                Err(GolinkError::timeout(format!(
                    "slug lookup exceeded {} ms",
                    self.settings.lookup_timeout.as_millis()
                )))
            }
        }
    }
}
