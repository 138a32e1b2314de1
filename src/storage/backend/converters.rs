use tracing::warn;

use crate::storage::{Identity, Link, Role, Visibility};
use migration::entities::{identity, link};

/// 解析 co_owner_ids 列（JSON 数组）；格式错误时视为没有共同所有者
pub fn parse_co_owner_ids(raw: Option<&str>) -> Vec<i64> {
    match raw.map(str::trim) {
        None | Some("") => Vec::new(),
        Some(json) => serde_json::from_str(json).unwrap_or_else(|e| {
            warn!("Ignoring malformed co_owner_ids '{}': {}", json, e);
            Vec::new()
        }),
    }
}

/// 将 Sea-ORM Model 转换为 Link
pub fn model_to_link(model: link::Model) -> Link {
    Link {
        id: model.id,
        slug: model.slug,
        url_template: model.url_template,
        visibility: Visibility::from_stored(&model.visibility),
        owner_id: model.owner_id,
        co_owner_ids: parse_co_owner_ids(model.co_owner_ids.as_deref()),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub fn model_to_identity(model: identity::Model) -> Identity {
    Identity {
        id: model.id,
        username: model.username,
        role: model.role.parse().unwrap_or(Role::Member),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn model(visibility: &str, co_owners: Option<&str>) -> link::Model {
        let now = Utc::now();
        link::Model {
            id: 5,
            slug: "team/roadmap".to_string(),
            url_template: "https://docs.example.com/roadmap".to_string(),
            visibility: visibility.to_string(),
            owner_id: Some(1),
            co_owner_ids: co_owners.map(String::from),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_model_to_link() {
        let link = model_to_link(model("private", Some("[2, 3]")));
        assert_eq!(link.slug, "team/roadmap");
        assert_eq!(link.visibility, Visibility::Private);
        assert_eq!(link.co_owner_ids, vec![2, 3]);
    }

    #[test]
    fn test_unknown_visibility_fails_closed() {
        let link = model_to_link(model("internal", None));
        assert_eq!(link.visibility, Visibility::Secure);
        assert!(link.co_owner_ids.is_empty());
    }

    #[test]
    fn test_malformed_co_owners_are_ignored() {
        assert!(parse_co_owner_ids(Some("not json")).is_empty());
        assert!(parse_co_owner_ids(Some("  ")).is_empty());
    }

    #[test]
    fn test_model_to_identity_role() {
        let now = Utc::now();
        let admin = model_to_identity(identity::Model {
            id: 1,
            username: "root".to_string(),
            role: "Admin".to_string(),
            created_at: now,
        });
        assert_eq!(admin.role, Role::Admin);

        let unknown = model_to_identity(identity::Model {
            id: 2,
            username: "guest".to_string(),
            role: "superuser".to_string(),
            created_at: now,
        });
        assert_eq!(unknown.role, Role::Member);
    }
}
