use chess_core::MoveError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The rules engine refused a move the search tried to play. The position
    /// is handed back unchanged and no result is produced.
    #[error("search tried to play a move the board rejected: {0}")]
    IllegalMove(#[from] MoveError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown difficulty {0:?}, expected easy, medium or hard")]
pub struct ParseDifficultyError(pub String);
