use anyhow::Result;
use chrono::{Duration, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set,
};

use crate::entities::{players, prelude::*};
use quiz_types::{Player, PlayerId};

#[derive(Clone)]
pub struct PlayerRepository {
    db: DatabaseConnection,
}

impl PlayerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_player(model: players::Model) -> Player {
        Player {
            id: model.id,
            name: model.name,
            created_at: model.created_at.to_rfc3339(),
            last_seen: model.last_seen.to_rfc3339(),
        }
    }

    /// Exact, case-sensitive name lookup. An existing player is returned
    /// without touching `last_seen`; a new one starts live.
    pub async fn get_or_create(&self, name: &str) -> Result<PlayerId> {
        if let Some(existing) = Players::find()
            .filter(players::Column::Name.eq(name))
            .one(&self.db)
            .await?
        {
            return Ok(existing.id);
        }

        let now = Utc::now();
        let model = players::ActiveModel {
            name: Set(name.to_owned()),
            created_at: Set(now),
            last_seen: Set(now),
            ..Default::default()
        };

        let inserted = Players::insert(model).exec(&self.db).await?;
        Ok(inserted.last_insert_id)
    }

    pub async fn find_by_id(&self, id: PlayerId) -> Result<Option<Player>> {
        let model = Players::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Self::model_to_player))
    }

    /// Called on every authenticated poll; a single UPDATE statement.
    pub async fn touch(&self, id: PlayerId) -> Result<()> {
        Players::update_many()
            .col_expr(players::Column::LastSeen, Expr::value(Utc::now()))
            .filter(players::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Detects sessions referencing a player deleted by a full reset.
    pub async fn exists(&self, id: PlayerId) -> Result<bool> {
        Ok(Players::find_by_id(id).one(&self.db).await?.is_some())
    }

    pub async fn live_count(&self, window: Duration) -> Result<u64> {
        let cutoff = Utc::now() - window;
        let count = Players::find()
            .filter(players::Column::LastSeen.gte(cutoff))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    /// Names of live players, ordered alphabetically, case-insensitively.
    pub async fn live_names(&self, window: Duration) -> Result<Vec<String>> {
        let cutoff = Utc::now() - window;
        let mut names: Vec<String> = Players::find()
            .filter(players::Column::LastSeen.gte(cutoff))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|m| m.name)
            .collect();
        names.sort_by_key(|n| n.to_lowercase());
        Ok(names)
    }

    /// Full reset only.
    pub async fn clear_all(&self) -> Result<()> {
        Players::delete_many().exec(&self.db).await?;
        Ok(())
    }
}
