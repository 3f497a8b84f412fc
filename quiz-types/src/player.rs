use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Database identity of a player. Assigned by the embedded store on first join.
pub type PlayerId = i32;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub created_at: String, // ISO 8601 string for simplicity
    pub last_seen: String,  // ISO 8601 string
}
