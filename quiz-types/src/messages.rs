use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::game::{
    AnswerOutcome, AnswerStats, OverallLeaderboardRow, SessionPhase, WordLeaderboardRow,
};
use crate::player::PlayerId;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionCreatedResponse {
    pub session_id: String,
    /// Refresh cadence the client should poll at.
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct JoinRequest {
    pub session_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct JoinResponse {
    pub player_id: PlayerId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PollRequest {
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnswerRequest {
    pub session_id: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AdminUnlockRequest {
    pub session_id: String,
    pub pin: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AdminActionRequest {
    pub session_id: String,
}

/// Everything a player view needs to render one poll cycle.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub player_name: Option<String>,
    /// 1-based display position of the current word, absent once the game is over.
    pub word_number: Option<i32>,
    pub total_words: i32,
    pub scramble: Option<String>,
    pub clue: Option<String>,
    pub elapsed_seconds: i64,
    pub remaining_seconds: i64,
    pub live_players: u64,
    /// Canonical answer, revealed only once this session has answered or timed out.
    pub revealed_answer: Option<String>,
    pub last_outcome: Option<AnswerOutcome>,
    pub overall_leaderboard: Vec<OverallLeaderboardRow>,
    pub word_leaderboard: Vec<WordLeaderboardRow>,
}

/// Host insights panel: liveness, per-word stats, and top-5 boards.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AdminStatsResponse {
    pub live_players: u64,
    pub live_names: Vec<String>,
    pub current_word_index: i32,
    pub word_number: Option<i32>,
    pub total_words: i32,
    pub is_active: bool,
    pub scramble: Option<String>,
    pub clue: Option<String>,
    pub elapsed_seconds: i64,
    pub remaining_seconds: i64,
    /// Revealed to the host once the round clock has run out.
    pub revealed_answer: Option<String>,
    pub word_stats: Option<AnswerStats>,
    pub overall_top: Vec<OverallLeaderboardRow>,
    pub word_top: Vec<WordLeaderboardRow>,
}
