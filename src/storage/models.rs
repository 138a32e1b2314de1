use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// 链接可见性
///
/// `private` 与 `public` 的唯一区别是不出现在列表/发现视图中（由管理层负责）。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Secure,
}

impl Visibility {
    /// Parse a stored value; anything unrecognised is treated as `Secure`.
    pub fn from_stored(value: &str) -> Self {
        value.trim().parse().unwrap_or(Visibility::Secure)
    }
}

/// A named redirect rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: i64,
    pub slug: String,
    pub url_template: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub owner_id: Option<i64>,
    #[serde(default)]
    pub co_owner_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Link {
    /// Owner or co-owner of this link.
    pub fn is_owned_by(&self, identity_id: i64) -> bool {
        self.owner_id == Some(identity_id) || self.co_owner_ids.contains(&identity_id)
    }
}

/// 新建链接所需字段（id 与时间戳由存储层生成）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLink {
    pub slug: String,
    pub url_template: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub owner_id: Option<i64>,
    #[serde(default)]
    pub co_owner_ids: Vec<i64>,
}

impl NewLink {
    pub fn new(slug: impl Into<String>, url_template: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            url_template: url_template.into(),
            ..Default::default()
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_owner(mut self, owner_id: i64) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn with_co_owners(mut self, ids: Vec<i64>) -> Self {
        self.co_owner_ids = ids;
        self
    }
}

/// 身份角色
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    #[default]
    Member,
    Admin,
}

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub role: Role,
}

impl Identity {
    pub fn new(id: i64, username: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            username: username.into(),
            role,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StorageConfig {
    pub storage_type: String,
}
