use std::collections::HashMap;

use anyhow::Result;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{prelude::*, scores};
use quiz_types::{AnswerStats, OverallLeaderboardRow, PlayerId, WordLeaderboardRow};

#[derive(Clone)]
pub struct ScoreRepository {
    db: DatabaseConnection,
}

impl ScoreRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Idempotent upsert keyed by (player_id, word_index): a resubmission
    /// overwrites the prior record, it never duplicates it. One statement,
    /// so concurrent readers see either the old or the new record.
    pub async fn record_answer(
        &self,
        player_id: PlayerId,
        word_index: i32,
        correct: bool,
        time_taken: Option<f64>,
    ) -> Result<()> {
        let model = scores::ActiveModel {
            player_id: Set(player_id),
            word_index: Set(word_index),
            correct: Set(correct),
            time_taken: Set(time_taken),
            answered_at: Set(Utc::now()),
            ..Default::default()
        };

        Scores::insert(model)
            .on_conflict(
                OnConflict::columns([scores::Column::PlayerId, scores::Column::WordIndex])
                    .update_columns([
                        scores::Column::Correct,
                        scores::Column::TimeTaken,
                        scores::Column::AnsweredAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;

        Ok(())
    }

    /// One row per registered player (even with no answers yet), ordered by
    /// correct count descending, then total correct time ascending.
    pub async fn overall_leaderboard(&self) -> Result<Vec<OverallLeaderboardRow>> {
        let players = Players::find().all(&self.db).await?;
        let correct_scores = Scores::find()
            .filter(scores::Column::Correct.eq(true))
            .all(&self.db)
            .await?;

        let mut totals: HashMap<PlayerId, (i64, f64)> = HashMap::new();
        for score in correct_scores {
            let entry = totals.entry(score.player_id).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += score.time_taken.unwrap_or(0.0);
        }

        let mut rows: Vec<(String, i64, f64)> = players
            .into_iter()
            .map(|p| {
                let (count, time) = totals.get(&p.id).copied().unwrap_or((0, 0.0));
                (p.name, count, time)
            })
            .collect();

        rows.sort_by(|a, b| {
            b.1.cmp(&a.1)
                .then(a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal))
        });

        Ok(rows
            .into_iter()
            .enumerate()
            .map(|(index, (name, correct_count, total_time))| OverallLeaderboardRow {
                rank: index as u32 + 1,
                name,
                correct_count,
                total_time,
            })
            .collect())
    }

    /// Correct answers for one word, fastest first.
    pub async fn per_word_leaderboard(&self, word_index: i32) -> Result<Vec<WordLeaderboardRow>> {
        let rows = Scores::find()
            .filter(scores::Column::WordIndex.eq(word_index))
            .filter(scores::Column::Correct.eq(true))
            .order_by_asc(scores::Column::TimeTaken)
            .find_also_related(Players)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .enumerate()
            .filter_map(|(index, (score, player))| {
                let player = player?;
                Some(WordLeaderboardRow {
                    rank: index as u32 + 1,
                    name: player.name,
                    time_taken: score.time_taken.unwrap_or(0.0),
                })
            })
            .collect())
    }

    pub async fn answer_stats(&self, word_index: i32) -> Result<AnswerStats> {
        let total = Scores::find()
            .filter(scores::Column::WordIndex.eq(word_index))
            .count(&self.db)
            .await? as i64;
        let correct = Scores::find()
            .filter(scores::Column::WordIndex.eq(word_index))
            .filter(scores::Column::Correct.eq(true))
            .count(&self.db)
            .await? as i64;

        Ok(AnswerStats {
            total,
            correct,
            incorrect: total - correct,
        })
    }

    /// Full reset only.
    pub async fn clear_all(&self) -> Result<()> {
        Scores::delete_many().exec(&self.db).await?;
        Ok(())
    }
}
