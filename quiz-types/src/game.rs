use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Authoritative singleton round record, shared by every session.
///
/// `round_start_time` may outlive `is_active`: stopping a round locks answers
/// without clearing the clock, so the host view keeps showing the final
/// elapsed time until the next word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub current_word_index: i32,
    pub round_start_time: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl RoundState {
    pub fn initial() -> Self {
        Self {
            current_word_index: 0,
            round_start_time: None,
            is_active: false,
        }
    }
}

/// Where a single connected session is in the game, re-derived on every poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SessionPhase {
    /// No display name submitted yet (or the player was deleted by a reset).
    Unjoined,
    /// Joined, round not running: upcoming scramble and clue are visible.
    Waiting,
    /// Round running and this session has not answered yet.
    Guessing,
    /// Answered (or timed out); answer input is locked for this word.
    Answered,
    /// Host advanced past the last word; final leaderboard only.
    GameOver,
}

/// Outcome of a judged submission, echoed back on subsequent polls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnswerOutcome {
    pub correct: bool,
    /// Seconds from round start to submission, only present when correct.
    pub time_taken: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OverallLeaderboardRow {
    pub rank: u32,
    pub name: String,
    pub correct_count: i64,
    /// Summed time of correct answers only, in seconds.
    pub total_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WordLeaderboardRow {
    pub rank: u32,
    pub name: String,
    pub time_taken: f64,
}

/// Submission counts for a single word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnswerStats {
    pub total: i64,
    pub correct: i64,
    pub incorrect: i64,
}
