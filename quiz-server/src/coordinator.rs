use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use quiz_core::{
    derive_phase, word_for_index, GameEngine, LIVE_WINDOW, TIME_LIMIT_SECS, TOTAL_WORDS,
};
use quiz_persistence::repositories::{PlayerRepository, RoundStateRepository, ScoreRepository};
use quiz_types::{
    AnswerOutcome, JoinResponse, QuizError, RoundState, SessionPhase, SessionSnapshot,
};

use crate::error::{ApiError, ApiResult};
use crate::sessions::SessionManager;

/// Player-facing session coordinator: reconciles each session's transient
/// state against the shared stores on every poll and mediates joins and
/// answer submissions.
pub struct SessionCoordinator {
    sessions: Arc<SessionManager>,
    players: PlayerRepository,
    scores: ScoreRepository,
    round_state: RoundStateRepository,
}

impl SessionCoordinator {
    pub fn new(
        sessions: Arc<SessionManager>,
        players: PlayerRepository,
        scores: ScoreRepository,
        round_state: RoundStateRepository,
    ) -> Self {
        Self {
            sessions,
            players,
            scores,
            round_state,
        }
    }

    pub async fn join(&self, session_id: Uuid, name: &str) -> ApiResult<JoinResponse> {
        if self.sessions.get(session_id).is_none() {
            return Err(QuizError::SessionNotFound.into());
        }

        let name = name.trim();
        if name.is_empty() {
            return Err(QuizError::NameRequired.into());
        }

        let player_id = self.players.get_or_create(name).await?;
        self.sessions
            .bind_player(session_id, player_id, name.to_owned());

        debug!(player_id, name, "player joined");
        Ok(JoinResponse {
            player_id,
            name: name.to_owned(),
        })
    }

    pub async fn poll(&self, session_id: Uuid) -> ApiResult<SessionSnapshot> {
        self.poll_at(session_id, Utc::now()).await
    }

    /// One refresh cycle for a session, evaluated at `now`.
    ///
    /// Ordering matters: dangling-player detection first (a full reset sends
    /// the session back to unjoined), then last-seen touch, then answered-flag
    /// reconciliation against the current word, then the once-only timeout
    /// auto-record, and finally the snapshot.
    pub async fn poll_at(&self, session_id: Uuid, now: DateTime<Utc>) -> ApiResult<SessionSnapshot> {
        let Some(session) = self.sessions.get(session_id) else {
            return Err(QuizError::SessionNotFound.into());
        };
        self.sessions.touch(session_id);

        if let Some(player_id) = session.player_id {
            if !self.players.exists(player_id).await? {
                debug!(player_id, "player vanished after reset, unjoining session");
                self.sessions.clear_player(session_id);
            } else {
                self.players.touch(player_id).await?;
            }
        }

        let round = self.round_state.get().await?;
        self.sessions.observe_word(session_id, round.current_word_index);

        // Re-read after reconciliation so the snapshot reflects this cycle.
        let mut session = self
            .sessions
            .get(session_id)
            .ok_or_else(|| ApiError::from(QuizError::SessionNotFound))?;

        let joined = session.player_id.is_some();
        let in_words = round.current_word_index < TOTAL_WORDS;

        let (elapsed, remaining) = match round.round_start_time {
            Some(start) if round.is_active => {
                GameEngine::elapsed_and_remaining(start, now, TIME_LIMIT_SECS)
            }
            _ => (0, 0),
        };

        // Timeout auto-record: the first poll that sees the window closed on
        // an unanswered active round writes the implicit incorrect record.
        // The answered flag keeps later polls from writing again.
        if joined
            && in_words
            && round.is_active
            && round.round_start_time.is_some()
            && remaining == 0
            && !session.has_answered
        {
            let player_id = session.player_id.unwrap_or_default();
            self.scores
                .record_answer(player_id, round.current_word_index, false, None)
                .await?;
            let outcome = AnswerOutcome {
                correct: false,
                time_taken: None,
            };
            self.sessions.mark_answered(session_id, outcome.clone());
            session.has_answered = true;
            session.last_outcome = Some(outcome);
        }

        self.snapshot(&session, &round, elapsed, remaining).await
    }

    pub async fn answer(&self, session_id: Uuid, submitted: &str) -> ApiResult<AnswerOutcome> {
        self.answer_at(session_id, submitted, Utc::now()).await
    }

    /// Judge and persist one submission. The session accepts exactly one
    /// answer per word; lateness is judged, not rejected, so a slow submit
    /// still converges to a (single) incorrect record.
    pub async fn answer_at(
        &self,
        session_id: Uuid,
        submitted: &str,
        now: DateTime<Utc>,
    ) -> ApiResult<AnswerOutcome> {
        let Some(session) = self.sessions.get(session_id) else {
            return Err(QuizError::SessionNotFound.into());
        };

        let Some(player_id) = session.player_id else {
            return Err(QuizError::NotJoined.into());
        };
        if !self.players.exists(player_id).await? {
            self.sessions.clear_player(session_id);
            return Err(QuizError::NotJoined.into());
        }

        if submitted.trim().is_empty() {
            return Err(QuizError::AnswerRequired.into());
        }

        let round = self.round_state.get().await?;
        if round.current_word_index >= TOTAL_WORDS {
            return Err(QuizError::GameOver.into());
        }

        // A submission racing a host advance counts against the word the
        // session last rendered, never the new one.
        self.sessions.observe_word(session_id, round.current_word_index);
        let session = self
            .sessions
            .get(session_id)
            .ok_or_else(|| ApiError::from(QuizError::SessionNotFound))?;
        if session.has_answered {
            return Err(QuizError::AlreadyAnswered.into());
        }

        let Some(start) = round.round_start_time.filter(|_| round.is_active) else {
            return Err(QuizError::RoundNotActive.into());
        };

        let entry = word_for_index(round.current_word_index)
            .ok_or_else(|| ApiError::from(QuizError::GameOver))?;

        let outcome = GameEngine::judge(submitted, entry, start, now, TIME_LIMIT_SECS);
        self.scores
            .record_answer(
                player_id,
                round.current_word_index,
                outcome.correct,
                outcome.time_taken,
            )
            .await?;
        self.sessions.mark_answered(session_id, outcome.clone());

        debug!(
            player_id,
            word_index = round.current_word_index,
            correct = outcome.correct,
            "answer recorded"
        );
        Ok(outcome)
    }

    async fn snapshot(
        &self,
        session: &crate::sessions::Session,
        round: &RoundState,
        elapsed: i64,
        remaining: i64,
    ) -> ApiResult<SessionSnapshot> {
        let joined = session.player_id.is_some();
        let phase = derive_phase(joined, round, session.has_answered);

        let entry = word_for_index(round.current_word_index);
        let (word_number, scramble, clue) = match entry {
            Some(e) => (
                Some(e.index + 1),
                Some(e.scramble.to_owned()),
                Some(e.clue.to_owned()),
            ),
            None => (None, None, None),
        };

        let revealed_answer = match (phase, entry) {
            (SessionPhase::Answered, Some(e)) => Some(e.answer.to_owned()),
            _ => None,
        };

        let live_players = self.players.live_count(LIVE_WINDOW).await?;
        let overall_leaderboard = self.scores.overall_leaderboard().await?;
        let word_leaderboard = match entry {
            Some(e) => self.scores.per_word_leaderboard(e.index).await?,
            None => Vec::new(),
        };

        Ok(SessionSnapshot {
            phase,
            player_name: session.player_name.clone(),
            word_number,
            total_words: TOTAL_WORDS,
            scramble,
            clue,
            elapsed_seconds: elapsed,
            remaining_seconds: remaining,
            live_players,
            revealed_answer,
            last_outcome: session.last_outcome.clone(),
            overall_leaderboard,
            word_leaderboard,
        })
    }
}
