use sea_orm_migration::prelude::*;

use crate::{m20260810_000001_users::Users, m20260810_000002_households::Households};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum HouseholdMembers {
    Table,
    HouseholdId,
    Username,
    Role,
    JoinedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HouseholdMembers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HouseholdMembers::HouseholdId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HouseholdMembers::Username)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(HouseholdMembers::Role).string().not_null())
                    .col(
                        ColumnDef::new(HouseholdMembers::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(HouseholdMembers::HouseholdId)
                            .col(HouseholdMembers::Username),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-household_members-household_id")
                            .from(HouseholdMembers::Table, HouseholdMembers::HouseholdId)
                            .to(Households::Table, Households::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-household_members-username")
                            .from(HouseholdMembers::Table, HouseholdMembers::Username)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-household_members-username")
                    .table(HouseholdMembers::Table)
                    .col(HouseholdMembers::Username)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HouseholdMembers::Table).to_owned())
            .await
    }
}
