//! 从认证代理注入的请求头中提取身份
//!
//! 认证本身不在本服务内完成；未开启 `auth.trust_identity_headers` 时
//! 所有请求都视为匿名。

use actix_web::http::header::HeaderMap;
use tracing::trace;

use crate::config::AuthConfig;
use crate::storage::{Identity, Role};

#[derive(Debug, Clone)]
pub struct IdentityHeaders {
    enabled: bool,
    user_id_header: String,
    username_header: String,
    role_header: String,
}

impl From<&AuthConfig> for IdentityHeaders {
    fn from(config: &AuthConfig) -> Self {
        Self {
            enabled: config.trust_identity_headers,
            user_id_header: config.user_id_header.to_ascii_lowercase(),
            username_header: config.username_header.to_ascii_lowercase(),
            role_header: config.role_header.to_ascii_lowercase(),
        }
    }
}

impl IdentityHeaders {
    /// 所有请求都是匿名的提取器
    pub fn anonymous() -> Self {
        Self {
            enabled: false,
            user_id_header: String::new(),
            username_header: String::new(),
            role_header: String::new(),
        }
    }

    pub fn extract(&self, headers: &HeaderMap) -> Option<Identity> {
        if !self.enabled {
            return None;
        }

        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        // id 缺失或不是数字 → 匿名
        let id = header(&self.user_id_header)?.parse::<i64>().ok()?;
        let username = header(&self.username_header).unwrap_or_default();
        let role = header(&self.role_header)
            .and_then(|r| r.parse::<Role>().ok())
            .unwrap_or_default();

        trace!("Request identity: id={} role={}", id, role);
        Some(Identity::new(id, username, role))
    }
}
