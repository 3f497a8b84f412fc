use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RoundState::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RoundState::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RoundState::CurrentWordIndex)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(RoundState::RoundStartTime)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(RoundState::IsActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        // Seed the singleton row; every update targets id = 1.
        let insert = Query::insert()
            .into_table(RoundState::Table)
            .columns([
                RoundState::Id,
                RoundState::CurrentWordIndex,
                RoundState::IsActive,
            ])
            .values_panic([1.into(), 0.into(), false.into()])
            .to_owned();
        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RoundState::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum RoundState {
    Table,
    Id,
    CurrentWordIndex,
    RoundStartTime,
    IsActive,
}
