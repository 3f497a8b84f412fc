pub mod player_repository;
pub mod round_state_repository;
pub mod score_repository;

pub use player_repository::PlayerRepository;
pub use round_state_repository::{RoundStateRepository, RoundStateUpdate};
pub use score_repository::ScoreRepository;
