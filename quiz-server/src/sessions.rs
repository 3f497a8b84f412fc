use std::time::{Duration, Instant};

use dashmap::DashMap;
use uuid::Uuid;

use quiz_types::{AnswerOutcome, PlayerId};

/// Transient, per-connection view state. Everything here is re-derived from
/// the authoritative stores on each poll and is never persisted.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub player_id: Option<PlayerId>,
    pub player_name: Option<String>,
    /// Last word index this session rendered; -1 before the first poll.
    pub seen_word_index: i32,
    pub has_answered: bool,
    pub last_outcome: Option<AnswerOutcome>,
    pub is_admin: bool,
    pub last_activity: Instant,
}

impl Session {
    fn new(id: Uuid) -> Self {
        Self {
            id,
            player_id: None,
            player_name: None,
            seen_word_index: -1,
            has_answered: false,
            last_outcome: None,
            is_admin: false,
            last_activity: Instant::now(),
        }
    }
}

#[derive(Default)]
pub struct SessionManager {
    sessions: DashMap<Uuid, Session>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn create_session(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.insert(id, Session::new(id));
        id
    }

    pub fn get(&self, id: Uuid) -> Option<Session> {
        self.sessions.get(&id).map(|s| s.clone())
    }

    pub fn touch(&self, id: Uuid) {
        if let Some(mut session) = self.sessions.get_mut(&id) {
            session.last_activity = Instant::now();
        }
    }

    pub fn bind_player(&self, id: Uuid, player_id: PlayerId, name: String) {
        if let Some(mut session) = self.sessions.get_mut(&id) {
            session.player_id = Some(player_id);
            session.player_name = Some(name);
        }
    }

    /// Back to unjoined (after a full reset deleted the player). Admin unlock
    /// is session-scoped and survives.
    pub fn clear_player(&self, id: Uuid) {
        if let Some(mut session) = self.sessions.get_mut(&id) {
            session.player_id = None;
            session.player_name = None;
            session.seen_word_index = -1;
            session.has_answered = false;
            session.last_outcome = None;
        }
    }

    /// Reconcile the local answered flag against the authoritative word
    /// index: when the host has advanced, the flag and the last outcome
    /// reset so the session re-enters waiting for the new word.
    pub fn observe_word(&self, id: Uuid, current_word_index: i32) {
        if let Some(mut session) = self.sessions.get_mut(&id) {
            if session.seen_word_index != current_word_index {
                session.seen_word_index = current_word_index;
                session.has_answered = false;
                session.last_outcome = None;
            }
        }
    }

    pub fn mark_answered(&self, id: Uuid, outcome: AnswerOutcome) {
        if let Some(mut session) = self.sessions.get_mut(&id) {
            session.has_answered = true;
            session.last_outcome = Some(outcome);
        }
    }

    pub fn set_admin(&self, id: Uuid) {
        if let Some(mut session) = self.sessions.get_mut(&id) {
            session.is_admin = true;
        }
    }

    /// Drop sessions that have stopped polling. Their player rows stay; a
    /// returning client simply creates a fresh session and rejoins.
    pub fn prune_stale(&self, max_idle: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| session.last_activity.elapsed() <= max_idle);
        before - self.sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
