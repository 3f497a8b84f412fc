pub mod players;
pub mod prelude;
pub mod round_state;
pub mod scores;
