use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use quiz_core::{word_for_index, GameEngine, LIVE_WINDOW, TIME_LIMIT_SECS, TOTAL_WORDS};
use quiz_persistence::repositories::{
    PlayerRepository, RoundStateRepository, RoundStateUpdate, ScoreRepository,
};
use quiz_types::{AdminStatsResponse, QuizError};

use crate::error::{ApiError, ApiResult};
use crate::sessions::SessionManager;

const LEADERBOARD_TOP: usize = 5;

/// Privileged variant of the session coordinator: mutates the round state and
/// exposes the host insights view. Gated by a PIN check, once per session.
pub struct AdminService {
    sessions: Arc<SessionManager>,
    players: PlayerRepository,
    scores: ScoreRepository,
    round_state: RoundStateRepository,
    admin_pin: String,
}

impl AdminService {
    pub fn new(
        sessions: Arc<SessionManager>,
        players: PlayerRepository,
        scores: ScoreRepository,
        round_state: RoundStateRepository,
        admin_pin: String,
    ) -> Self {
        Self {
            sessions,
            players,
            scores,
            round_state,
            admin_pin,
        }
    }

    /// Wrong PIN is a plain rejection: no lockout, no backoff. The trust
    /// boundary is a closed live event, not a public service.
    pub fn unlock(&self, session_id: Uuid, pin: &str) -> ApiResult<()> {
        if self.sessions.get(session_id).is_none() {
            return Err(QuizError::SessionNotFound.into());
        }
        if pin != self.admin_pin {
            warn!(%session_id, "rejected admin PIN attempt");
            return Err(QuizError::IncorrectPin.into());
        }
        self.sessions.set_admin(session_id);
        info!(%session_id, "admin controls unlocked");
        Ok(())
    }

    fn require_admin(&self, session_id: Uuid) -> ApiResult<()> {
        let Some(session) = self.sessions.get(session_id) else {
            return Err(QuizError::SessionNotFound.into());
        };
        if !session.is_admin {
            return Err(QuizError::AdminRequired.into());
        }
        Ok(())
    }

    /// Open the answer window for the current word. Restarting an already
    /// active round simply restarts the clock.
    pub async fn start_round(&self, session_id: Uuid) -> ApiResult<()> {
        self.require_admin(session_id)?;

        let round = self.round_state.get().await?;
        if round.current_word_index >= TOTAL_WORDS {
            return Err(QuizError::GameOver.into());
        }

        self.round_state
            .update(RoundStateUpdate {
                round_start_time: Some(Some(Utc::now())),
                is_active: Some(true),
                ..Default::default()
            })
            .await?;

        info!(word_index = round.current_word_index, "round started");
        Ok(())
    }

    /// Lock answers. The start time is left in place on purpose: the host
    /// view keeps showing the stopped round's clock until the next word.
    pub async fn stop_round(&self, session_id: Uuid) -> ApiResult<()> {
        self.require_admin(session_id)?;

        self.round_state
            .update(RoundStateUpdate {
                is_active: Some(false),
                ..Default::default()
            })
            .await?;

        info!("round stopped");
        Ok(())
    }

    /// Move to the next word (saturating at "game over"), clearing the clock
    /// and deactivating in the same atomic update.
    pub async fn advance_word(&self, session_id: Uuid) -> ApiResult<()> {
        self.require_admin(session_id)?;

        let round = self.round_state.get().await?;
        let next_index = (round.current_word_index + 1).min(TOTAL_WORDS);

        self.round_state
            .update(RoundStateUpdate {
                current_word_index: Some(next_index),
                round_start_time: Some(None),
                is_active: Some(false),
            })
            .await?;

        info!(word_index = next_index, "advanced to next word");
        Ok(())
    }

    /// Wipe scores and players and return the round state to word 0.
    /// Sessions discover their deleted player on their next poll and drop
    /// back to unjoined.
    pub async fn reset_game(&self, session_id: Uuid) -> ApiResult<()> {
        self.require_admin(session_id)?;

        self.scores.clear_all().await?;
        self.players.clear_all().await?;
        self.round_state.reset().await?;

        info!("game fully reset");
        Ok(())
    }

    /// Read-only aggregated host view; no state of its own.
    pub async fn stats(&self, session_id: Uuid) -> ApiResult<AdminStatsResponse> {
        self.require_admin(session_id)?;
        self.sessions.touch(session_id);

        let round = self.round_state.get().await?;
        let entry = word_for_index(round.current_word_index);

        // The host clock runs off the stored start time even for a stopped
        // round, matching the stale-start-time behavior of stop_round.
        let (elapsed, remaining) = match round.round_start_time {
            Some(start) => GameEngine::elapsed_and_remaining(start, Utc::now(), TIME_LIMIT_SECS),
            None => (0, 0),
        };

        let revealed_answer = entry
            .filter(|_| round.round_start_time.is_some() && remaining == 0)
            .map(|e| e.answer.to_owned());

        let word_stats = match entry {
            Some(e) => Some(self.scores.answer_stats(e.index).await?),
            None => None,
        };

        let mut overall_top = self.scores.overall_leaderboard().await?;
        overall_top.truncate(LEADERBOARD_TOP);

        let mut word_top = match entry {
            Some(e) => self.scores.per_word_leaderboard(e.index).await?,
            None => Vec::new(),
        };
        word_top.truncate(LEADERBOARD_TOP);

        Ok(AdminStatsResponse {
            live_players: self.players.live_count(LIVE_WINDOW).await?,
            live_names: self.players.live_names(LIVE_WINDOW).await?,
            current_word_index: round.current_word_index,
            word_number: entry.map(|e| e.index + 1),
            total_words: TOTAL_WORDS,
            is_active: round.is_active,
            scramble: entry.map(|e| e.scramble.to_owned()),
            clue: entry.map(|e| e.clue.to_owned()),
            elapsed_seconds: elapsed,
            remaining_seconds: remaining,
            revealed_answer,
            word_stats,
            overall_top,
            word_top,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use quiz_persistence::connection::connect_to_memory_database;
    use quiz_types::RoundState;

    struct Harness {
        admin: AdminService,
        sessions: Arc<SessionManager>,
        players: PlayerRepository,
        scores: ScoreRepository,
        round_state: RoundStateRepository,
    }

    async fn setup() -> Harness {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let sessions = Arc::new(SessionManager::new());
        let players = PlayerRepository::new(db.clone());
        let scores = ScoreRepository::new(db.clone());
        let round_state = RoundStateRepository::new(db);

        Harness {
            admin: AdminService::new(
                sessions.clone(),
                players.clone(),
                scores.clone(),
                round_state.clone(),
                "test-pin".to_string(),
            ),
            sessions,
            players,
            scores,
            round_state,
        }
    }

    fn unlocked(h: &Harness) -> Uuid {
        let sid = h.sessions.create_session();
        h.admin.unlock(sid, "test-pin").unwrap();
        sid
    }

    #[tokio::test]
    async fn test_unlock_rejects_wrong_pin() {
        let h = setup().await;
        let sid = h.sessions.create_session();

        let err = h.admin.unlock(sid, "nope").unwrap_err();
        assert!(matches!(err, ApiError::Rejected(QuizError::IncorrectPin)));
        assert!(!h.sessions.get(sid).unwrap().is_admin);
    }

    #[tokio::test]
    async fn test_mutations_require_unlock() {
        let h = setup().await;
        let sid = h.sessions.create_session();

        let err = h.admin.start_round(sid).await.unwrap_err();
        assert!(matches!(err, ApiError::Rejected(QuizError::AdminRequired)));
    }

    #[tokio::test]
    async fn test_start_and_stop_round() {
        let h = setup().await;
        let sid = unlocked(&h);

        h.admin.start_round(sid).await.unwrap();
        let round = h.round_state.get().await.unwrap();
        assert!(round.is_active);
        assert!(round.round_start_time.is_some());

        h.admin.stop_round(sid).await.unwrap();
        let round = h.round_state.get().await.unwrap();
        assert!(!round.is_active);
        // Stop leaves the clock in place
        assert!(round.round_start_time.is_some());
    }

    #[tokio::test]
    async fn test_advance_saturates_at_game_over() {
        let h = setup().await;
        let sid = unlocked(&h);

        for _ in 0..TOTAL_WORDS + 2 {
            h.admin.advance_word(sid).await.unwrap();
        }

        let round = h.round_state.get().await.unwrap();
        assert_eq!(round.current_word_index, TOTAL_WORDS);
        assert_eq!(round.round_start_time, None);

        let err = h.admin.start_round(sid).await.unwrap_err();
        assert!(matches!(err, ApiError::Rejected(QuizError::GameOver)));
    }

    #[tokio::test]
    async fn test_reset_game_clears_everything() {
        let h = setup().await;
        let sid = unlocked(&h);

        let ada = h.players.get_or_create("Ada").await.unwrap();
        h.scores.record_answer(ada, 0, true, Some(4.0)).await.unwrap();
        h.admin.start_round(sid).await.unwrap();
        h.admin.advance_word(sid).await.unwrap();

        h.admin.reset_game(sid).await.unwrap();

        assert!(!h.players.exists(ada).await.unwrap());
        assert_eq!(h.scores.answer_stats(0).await.unwrap().total, 0);
        assert_eq!(h.round_state.get().await.unwrap(), RoundState::initial());
    }

    #[tokio::test]
    async fn test_stats_view() {
        let h = setup().await;
        let sid = unlocked(&h);

        let ada = h.players.get_or_create("Ada").await.unwrap();
        let bo = h.players.get_or_create("Bo").await.unwrap();
        h.scores.record_answer(ada, 0, true, Some(4.0)).await.unwrap();
        h.scores.record_answer(bo, 0, false, None).await.unwrap();

        let stats = h.admin.stats(sid).await.unwrap();
        assert_eq!(stats.live_players, 2);
        assert_eq!(stats.live_names, vec!["Ada", "Bo"]);
        assert_eq!(stats.word_number, Some(1));
        assert_eq!(stats.scramble.as_deref(), Some("GNEGAEMNET"));
        // Round never started: answer stays hidden from the host view
        assert_eq!(stats.revealed_answer, None);

        let word_stats = stats.word_stats.unwrap();
        assert_eq!(word_stats.total, 2);
        assert_eq!(word_stats.correct, 1);

        assert_eq!(stats.overall_top.len(), 2);
        assert_eq!(stats.overall_top[0].name, "Ada");
    }
}
