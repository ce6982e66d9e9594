pub use sea_orm_migration::prelude::*;

mod m20260901_add_indexes;
mod m20260901_create_all_tables;
mod m20260902_add_search_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260901_create_all_tables::Migration),
            Box::new(m20260901_add_indexes::Migration),
            Box::new(m20260902_add_search_indexes::Migration),
        ]
    }
}
