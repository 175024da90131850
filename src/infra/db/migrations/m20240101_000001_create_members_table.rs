//! Migration: Create the members table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Members::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Members::Id).uuid().not_null().primary_key())
                    // BIGSERIAL: the store assigns a strictly increasing value
                    // on insert, used only for cursor ordering
                    .col(
                        ColumnDef::new(Members::Seq)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Members::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Members::Name).string().not_null())
                    .col(ColumnDef::new(Members::Age).integer().null())
                    .col(
                        ColumnDef::new(Members::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Members::CreatedBy).string().not_null())
                    .col(
                        ColumnDef::new(Members::ChangedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Members::ChangedBy).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Cursor pagination scans by ascending sequence number
        manager
            .create_index(
                Index::create()
                    .name("idx_members_seq")
                    .table(Members::Table)
                    .col(Members::Seq)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Members::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Members {
    Table,
    Id,
    Seq,
    Email,
    Name,
    Age,
    CreatedAt,
    CreatedBy,
    ChangedAt,
    ChangedBy,
}
