use anyhow::Result;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::entities::{prelude::*, round_state};
use quiz_types::RoundState;

const SINGLETON_ID: i32 = 1;

/// Partial update of the singleton round record. Only supplied fields are
/// written. `round_start_time` is tri-state: `None` leaves the column
/// untouched, `Some(None)` clears it, `Some(Some(t))` sets it.
#[derive(Debug, Clone, Default)]
pub struct RoundStateUpdate {
    pub current_word_index: Option<i32>,
    pub round_start_time: Option<Option<DateTime<Utc>>>,
    pub is_active: Option<bool>,
}

#[derive(Clone)]
pub struct RoundStateRepository {
    db: DatabaseConnection,
}

impl RoundStateRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get(&self) -> Result<RoundState> {
        let model = RoundStateRow::find_by_id(SINGLETON_ID).one(&self.db).await?;

        Ok(model
            .map(|m| RoundState {
                current_word_index: m.current_word_index,
                round_start_time: m.round_start_time,
                is_active: m.is_active,
            })
            .unwrap_or_else(RoundState::initial))
    }

    /// Applies the supplied fields as a single UPDATE statement, so a
    /// concurrent reader observes either the whole update or none of it.
    pub async fn update(&self, update: RoundStateUpdate) -> Result<()> {
        let RoundStateUpdate {
            current_word_index,
            round_start_time,
            is_active,
        } = update;

        if current_word_index.is_none() && round_start_time.is_none() && is_active.is_none() {
            return Ok(());
        }

        let mut stmt =
            RoundStateRow::update_many().filter(round_state::Column::Id.eq(SINGLETON_ID));

        if let Some(index) = current_word_index {
            stmt = stmt.col_expr(round_state::Column::CurrentWordIndex, Expr::value(index));
        }
        if let Some(start_time) = round_start_time {
            stmt = stmt.col_expr(round_state::Column::RoundStartTime, Expr::value(start_time));
        }
        if let Some(active) = is_active {
            stmt = stmt.col_expr(round_state::Column::IsActive, Expr::value(active));
        }

        stmt.exec(&self.db).await?;
        Ok(())
    }

    /// Back to word 0, inactive, no start time. Full reset only.
    pub async fn reset(&self) -> Result<()> {
        self.update(RoundStateUpdate {
            current_word_index: Some(0),
            round_start_time: Some(None),
            is_active: Some(false),
        })
        .await
    }
}
