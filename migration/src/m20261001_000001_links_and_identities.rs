//! 初始表结构
//!
//! - links: 短链接（slug 唯一索引，重定向热路径唯一的查询）
//! - identities: 用户身份
//! - share_grants: secure 链接的单用户授权

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Links::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Links::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Links::Slug).string_len(255).not_null())
                    .col(ColumnDef::new(Links::UrlTemplate).text().not_null())
                    .col(
                        ColumnDef::new(Links::Visibility)
                            .string_len(16)
                            .not_null()
                            .default("public"),
                    )
                    .col(ColumnDef::new(Links::OwnerId).big_integer().null())
                    .col(ColumnDef::new(Links::CoOwnerIds).text().null())
                    .col(
                        ColumnDef::new(Links::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Links::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_links_slug")
                    .table(Links::Table)
                    .col(Links::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Identities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Identities::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Identities::Username)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Identities::Role)
                            .string_len(16)
                            .not_null()
                            .default("member"),
                    )
                    .col(
                        ColumnDef::new(Identities::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ShareGrants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ShareGrants::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ShareGrants::LinkId).big_integer().not_null())
                    .col(
                        ColumnDef::new(ShareGrants::IdentityId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ShareGrants::GrantedBy).big_integer().null())
                    .col(
                        ColumnDef::new(ShareGrants::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_share_grants_link")
                            .from(ShareGrants::Table, ShareGrants::LinkId)
                            .to(Links::Table, Links::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_share_grants_identity")
                            .from(ShareGrants::Table, ShareGrants::IdentityId)
                            .to(Identities::Table, Identities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // (link_id, identity_id) 唯一，同时作为存在性检查的索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_share_grants_link_identity")
                    .table(ShareGrants::Table)
                    .col(ShareGrants::LinkId)
                    .col(ShareGrants::IdentityId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ShareGrants::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Identities::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_links_slug").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Links::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Links {
    #[sea_orm(iden = "links")]
    Table,
    Id,
    Slug,
    UrlTemplate,
    Visibility,
    OwnerId,
    CoOwnerIds,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Identities {
    #[sea_orm(iden = "identities")]
    Table,
    Id,
    Username,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ShareGrants {
    #[sea_orm(iden = "share_grants")]
    Table,
    Id,
    LinkId,
    IdentityId,
    GrantedBy,
    CreatedAt,
}
