//! 点击事件构造
//!
//! 客户端地址从不以明文落库：只保存 `sha256("<addr>:<YYYY-MM-DD>")`，
//! 日期（UTC）是唯一的轮换因子，跨天无法关联同一客户端。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::ClickConfig;

/// Request-side facts a click is built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    /// HEAD 请求只探测目标地址，不计入点击
    pub head_request: bool,
}

/// 截断上限
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureLimits {
    pub max_user_agent_len: usize,
    pub max_referrer_len: usize,
}

impl Default for CaptureLimits {
    fn default() -> Self {
        Self {
            max_user_agent_len: 256,
            max_referrer_len: 512,
        }
    }
}

impl From<&ClickConfig> for CaptureLimits {
    fn from(config: &ClickConfig) -> Self {
        Self {
            max_user_agent_len: config.max_user_agent_len,
            max_referrer_len: config.max_referrer_len,
        }
    }
}

/// One successful redirect, as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickEvent {
    pub link_id: i64,
    pub identity_id: Option<i64>,
    pub client_hash: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub clicked_at: DateTime<Utc>,
}

impl ClickEvent {
    pub fn capture(
        link_id: i64,
        identity_id: Option<i64>,
        client: &ClientInfo,
        limits: CaptureLimits,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            link_id,
            identity_id,
            client_hash: client.ip.as_deref().map(|ip| hash_client(ip, now)),
            user_agent: non_empty(client.user_agent.as_deref())
                .map(|ua| truncate(ua, limits.max_user_agent_len)),
            referrer: non_empty(client.referrer.as_deref())
                .map(|r| truncate(r, limits.max_referrer_len)),
            clicked_at: now,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// 计算客户端标识哈希（十六进制 SHA-256）
pub fn hash_client(addr: &str, now: DateTime<Utc>) -> String {
    let input = format!("{}:{}", addr, now.format("%Y-%m-%d"));
    let digest = Sha256::digest(input.as_bytes());
    format!("{:x}", digest)
}

/// 按字符截断，保证不切断 UTF-8 多字节字符
pub fn truncate(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((idx, _)) => value[..idx].to_string(),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_hash_is_stable_within_a_day() {
        let morning = hash_client("203.0.113.9", at(2026, 10, 18, 1));
        let evening = hash_client("203.0.113.9", at(2026, 10, 18, 23));
        assert_eq!(morning, evening);
        assert_eq!(morning.len(), 64);
        assert!(morning.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_rotates_across_days() {
        let today = hash_client("203.0.113.9", at(2026, 10, 18, 12));
        let tomorrow = hash_client("203.0.113.9", at(2026, 10, 19, 12));
        assert_ne!(today, tomorrow);
    }

    #[test]
    fn test_hash_known_value() {
        // sha256("abc") 的标准测试向量，验证编码方式
        let digest = format!("{:x}", Sha256::digest(b"abc"));
        assert_eq!(
            digest,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("短链接服务", 3), "短链接");
        assert_eq!(truncate("abc", 10), "abc");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn test_capture_reduces_client_data() {
        let client = ClientInfo {
            ip: Some("198.51.100.7".to_string()),
            user_agent: Some("x".repeat(1000)),
            referrer: Some("   ".to_string()),
            head_request: false,
        };
        let now = at(2026, 10, 18, 8);
        let event = ClickEvent::capture(3, Some(9), &client, CaptureLimits::default(), now);

        assert_eq!(event.link_id, 3);
        assert_eq!(event.identity_id, Some(9));
        assert_eq!(event.client_hash, Some(hash_client("198.51.100.7", now)));
        assert_eq!(event.user_agent.as_deref().map(str::len), Some(256));
        assert_eq!(event.referrer, None);
        assert_eq!(event.clicked_at, now);
    }

    #[test]
    fn test_capture_without_address() {
        let event = ClickEvent::capture(
            1,
            None,
            &ClientInfo::default(),
            CaptureLimits::default(),
            Utc::now(),
        );
        assert!(event.client_hash.is_none());
        assert!(event.user_agent.is_none());
    }
}
