//! Computer opponent: static evaluation, alpha-beta search and the
//! difficulty tiers that decide how hard it plays.

pub mod ai;
pub mod board;
pub mod difficulty;
pub mod error;
pub mod evaluation;
pub mod search;

pub use ai::{best_move, ChessAI};
pub use board::{Applied, SearchBoard};
pub use difficulty::{Difficulty, SearchPolicy};
pub use error::{ParseDifficultyError, SearchError};
pub use evaluation::{evaluate_position, Score};
pub use search::{alpha_beta, choose_move, search, SearchOutcome, SearchStats, INFINITY};
