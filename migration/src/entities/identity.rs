use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "identities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    /// member / admin
    pub role: String,
    pub created_at: DateTimeUtc,
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
