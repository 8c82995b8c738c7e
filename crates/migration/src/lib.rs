pub use sea_orm_migration::prelude::*;

mod m20260110_090000_expenses;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20260110_090000_expenses::Migration)]
    }
}
