pub use sea_orm_migration::prelude::*;

mod m20260810_000001_users;
mod m20260810_000002_households;
mod m20260810_000003_household_members;
mod m20260810_000004_expenses;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260810_000001_users::Migration),
            Box::new(m20260810_000002_households::Migration),
            Box::new(m20260810_000003_household_members::Migration),
            Box::new(m20260810_000004_expenses::Migration),
        ]
    }
}
