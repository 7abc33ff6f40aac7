use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum Households {
    Table,
    Id,
    Name,
    Description,
    AdminId,
    InviteCode,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Households::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Households::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Households::Name).string().not_null())
                    .col(ColumnDef::new(Households::Description).string().null())
                    .col(ColumnDef::new(Households::AdminId).string().not_null())
                    .col(ColumnDef::new(Households::InviteCode).string().not_null())
                    .col(
                        ColumnDef::new(Households::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Storage backstop for invite-code uniqueness; the allocator's
        // check-then-reserve is the first line of defense.
        manager
            .create_index(
                Index::create()
                    .name("idx-households-invite_code")
                    .table(Households::Table)
                    .col(Households::InviteCode)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Households::Table).to_owned())
            .await
    }
}
