//! Chess rules: board state, legal move generation, move application and
//! undo, FEN, and game-end detection.

pub mod board;
pub mod error;
pub mod fen;
pub mod moves;
mod movegen;
pub mod piece;
pub mod position;

pub use board::{Board, CastlingRights};
pub use error::{FenError, MoveError, ParseMoveError, ParsePositionError};
pub use fen::STARTING_FEN;
pub use moves::{Move, MoveResult, MoveType};
pub use piece::{Color, Piece, PieceType};
pub use position::Position;
