use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Scores::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Scores::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Scores::PlayerId).integer().not_null())
                    .col(ColumnDef::new(Scores::WordIndex).integer().not_null())
                    .col(ColumnDef::new(Scores::Correct).boolean().not_null())
                    .col(ColumnDef::new(Scores::TimeTaken).double().null())
                    .col(
                        ColumnDef::new(Scores::AnsweredAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scores_player_id")
                            .from(Scores::Table, Scores::PlayerId)
                            .to(Players::Table, Players::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // One record per (player, word); the upsert in the repository relies
        // on this constraint.
        manager
            .create_index(
                Index::create()
                    .name("idx_scores_player_word")
                    .table(Scores::Table)
                    .col(Scores::PlayerId)
                    .col(Scores::WordIndex)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scores_word_index")
                    .table(Scores::Table)
                    .col(Scores::WordIndex)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Scores::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Scores {
    Table,
    Id,
    PlayerId,
    WordIndex,
    Correct,
    TimeTaken,
    AnsweredAt,
}

#[derive(DeriveIden)]
enum Players {
    Table,
    Id,
}
