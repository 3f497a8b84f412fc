pub use super::players::Entity as Players;
pub use super::round_state::Entity as RoundStateRow;
pub use super::scores::Entity as Scores;
