use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Rejections surfaced to the submitting client. None of these mutate state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum QuizError {
    NameRequired,
    AnswerRequired,
    SessionNotFound,
    NotJoined,
    RoundNotActive,
    AlreadyAnswered,
    GameOver,
    AdminRequired,
    IncorrectPin,
}

impl QuizError {
    pub fn message(&self) -> &'static str {
        match self {
            QuizError::NameRequired => "Please enter a name.",
            QuizError::AnswerRequired => "Please enter an answer.",
            QuizError::SessionNotFound => "Unknown session.",
            QuizError::NotJoined => "Join the game before answering.",
            QuizError::RoundNotActive => "The round has not started.",
            QuizError::AlreadyAnswered => "You have already answered this word.",
            QuizError::GameOver => "All words have been completed.",
            QuizError::AdminRequired => "Admin controls are locked.",
            QuizError::IncorrectPin => "Incorrect PIN.",
        }
    }
}
