use chrono::{DateTime, Duration, Utc};
use quiz_types::AnswerOutcome;

use crate::words::WordEntry;

/// Answer window per word, in seconds.
pub const TIME_LIMIT_SECS: i64 = 30;

/// A player counts as "live" if it polled within this trailing window.
pub const LIVE_WINDOW: Duration = Duration::minutes(10);

/// Poll cadence every connected session uses against the shared store.
pub const POLL_INTERVAL_MS: u64 = 1000;

pub struct GameEngine;

impl GameEngine {
    /// Whole seconds since the round started (floored) and whole seconds left
    /// in the answer window (never negative).
    ///
    /// Timeouts are a derived fact: every poll recomputes this from the stored
    /// start time and the wall clock, so there is no timer task to cancel.
    pub fn elapsed_and_remaining(
        round_start_time: DateTime<Utc>,
        now: DateTime<Utc>,
        time_limit_secs: i64,
    ) -> (i64, i64) {
        let elapsed = (now - round_start_time).num_seconds().max(0);
        let remaining = (time_limit_secs - elapsed).max(0);
        (elapsed, remaining)
    }

    /// Judge a submission against the canonical answer.
    ///
    /// Text is trimmed and upper-cased before comparison. A submission is
    /// correct only if it matches exactly and the raw elapsed time is within
    /// the limit; `time_taken` is reported (clamped to the limit) only for
    /// correct answers.
    pub fn judge(
        submitted: &str,
        entry: &WordEntry,
        round_start_time: DateTime<Utc>,
        now: DateTime<Utc>,
        time_limit_secs: i64,
    ) -> AnswerOutcome {
        let elapsed = (now - round_start_time).num_milliseconds() as f64 / 1000.0;
        let normalized = submitted.trim().to_uppercase();

        let correct = normalized == entry.answer && elapsed <= time_limit_secs as f64;

        AnswerOutcome {
            correct,
            time_taken: if correct {
                Some(elapsed.min(time_limit_secs as f64))
            } else {
                None
            },
        }
    }
}
