use thiserror::Error;

use crate::{Color, Move, Position};

/// Reasons a move request is rejected by [`Board::make_move`](crate::Board::make_move).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("no piece on {0}")]
    EmptySquare(Position),
    #[error("it is not {color}'s turn")]
    WrongTurn { color: Color },
    #[error("{0} is not a legal move")]
    Illegal(Move),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("expected 4 or 6 space separated fields, found {0}")]
    FieldCount(usize),
    #[error("invalid piece placement: {0}")]
    Placement(String),
    #[error("invalid side to move: {0}")]
    SideToMove(String),
    #[error("invalid castling availability: {0}")]
    Castling(String),
    #[error("invalid en passant square: {0}")]
    EnPassant(String),
    #[error("invalid move counter: {0}")]
    Counter(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid square: {0:?}")]
pub struct ParsePositionError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid coordinate move: {0:?}")]
pub struct ParseMoveError(pub String);
