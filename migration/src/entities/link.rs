use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "links")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub url_template: String,
    /// public / private / secure
    pub visibility: String,
    pub owner_id: Option<i64>,
    /// JSON array of identity ids, e.g. `[3,7]`
    #[sea_orm(column_type = "Text", nullable)]
    pub co_owner_ids: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::share_grant::Entity")]
    ShareGrant,
}

impl Related<super::share_grant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShareGrant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
