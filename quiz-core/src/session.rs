use quiz_types::{RoundState, SessionPhase};

use crate::words::TOTAL_WORDS;

/// Derive the phase a session should render, given the authoritative round
/// state and the session's own transient answered flag.
///
/// The answered flag is expected to already be reconciled against
/// `current_word_index` (it resets whenever the host advances) and to be set
/// by the timeout auto-record, so a session whose window ran out lands in
/// `Answered`, not `Guessing`.
pub fn derive_phase(joined: bool, round: &RoundState, has_answered: bool) -> SessionPhase {
    if !joined {
        return SessionPhase::Unjoined;
    }
    if round.current_word_index >= TOTAL_WORDS {
        return SessionPhase::GameOver;
    }
    if has_answered {
        return SessionPhase::Answered;
    }
    if round.is_active && round.round_start_time.is_some() {
        return SessionPhase::Guessing;
    }
    SessionPhase::Waiting
}
