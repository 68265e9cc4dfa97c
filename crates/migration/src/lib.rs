pub use sea_orm_migration::prelude::*;

mod m20260301_090000_init_schema;
mod m20260315_100000_create_problem_solve;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_090000_init_schema::Migration),
            Box::new(m20260315_100000_create_problem_solve::Migration),
        ]
    }
}
