pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_players_table;
mod m20250101_000002_create_scores_table;
mod m20250101_000003_create_round_state_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_players_table::Migration),
            Box::new(m20250101_000002_create_scores_table::Migration),
            Box::new(m20250101_000003_create_round_state_table::Migration),
        ]
    }
}
