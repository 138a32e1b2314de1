//! 链接访问授权
//!
//! `evaluate` 是纯函数；只有 secure 链接遇到非所有者时才需要
//! 一次 ShareGrant 存在性查询，由 `authorize` 完成。

use std::collections::HashSet;

use tracing::debug;

use crate::errors::Result;
use crate::storage::{Identity, Link, LinkRepository, Role, Visibility};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny,
    RequireLogin,
}

/// Result of the pure part of the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    Decided(AccessDecision),
    /// 已登录、非管理员、非所有者：取决于是否持有 ShareGrant
    NeedsGrantCheck { link_id: i64, identity_id: i64 },
}

/// Who counts as elevated.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    admin_users: HashSet<String>,
}

impl AccessPolicy {
    pub fn new<I, S>(admin_users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            admin_users: admin_users.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_elevated(&self, identity: &Identity) -> bool {
        identity.role == Role::Admin || self.admin_users.contains(&identity.username)
    }

    pub fn evaluate(&self, link: &Link, identity: Option<&Identity>) -> Evaluation {
        match link.visibility {
            Visibility::Public | Visibility::Private => Evaluation::Decided(AccessDecision::Allow),
            Visibility::Secure => match identity {
                None => Evaluation::Decided(AccessDecision::RequireLogin),
                Some(id) if self.is_elevated(id) || link.is_owned_by(id.id) => {
                    Evaluation::Decided(AccessDecision::Allow)
                }
                Some(id) => Evaluation::NeedsGrantCheck {
                    link_id: link.id,
                    identity_id: id.id,
                },
            },
        }
    }

    /// 完整授权流程；查询失败时返回错误（调用方按失败关闭处理）
    pub async fn authorize(
        &self,
        repo: &dyn LinkRepository,
        link: &Link,
        identity: Option<&Identity>,
    ) -> Result<AccessDecision> {
        match self.evaluate(link, identity) {
            Evaluation::Decided(decision) => Ok(decision),
            Evaluation::NeedsGrantCheck {
                link_id,
                identity_id,
            } => {
                let granted = repo.has_share_grant(link_id, identity_id).await?;
                debug!(
                    "Secure link {} for identity {}: grant={}",
                    link_id, identity_id, granted
                );
                Ok(if granted {
                    AccessDecision::Allow
                } else {
                    AccessDecision::Deny
                })
            }
        }
    }
}
