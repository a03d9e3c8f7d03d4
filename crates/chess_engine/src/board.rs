//! What the search needs from a rules engine, and the scoped apply guard that
//! keeps make/undo balanced.

use std::fmt;
use std::ops::{Deref, DerefMut};

use chess_core::{piece::Color, Board, Move, MoveError, Piece, Position};

/// A mutable game position the search can walk through by applying and
/// undoing moves.
///
/// Implementations must restore their full state on `undo`, including side
/// to move, castling and en passant rights and repetition bookkeeping. The
/// search relies on this to hand the position back unchanged.
pub trait SearchBoard {
    type Move: Copy + PartialEq + fmt::Debug + fmt::Display;

    /// All legal moves for the side to move, in a stable order.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Plays `mv`. Must leave the position untouched when it fails.
    fn apply(&mut self, mv: Self::Move) -> Result<(), MoveError>;

    /// Takes back the most recent successful `apply`.
    fn undo(&mut self);

    /// Checkmate, stalemate or any other finished game.
    fn is_terminal(&self) -> bool;

    fn side_to_move(&self) -> Color;

    fn piece_at(&self, pos: Position) -> Option<Piece>;
}

impl SearchBoard for Board {
    type Move = Move;

    fn legal_moves(&self) -> Vec<Move> {
        Board::legal_moves(self)
    }

    fn apply(&mut self, mv: Move) -> Result<(), MoveError> {
        self.make_move(mv).map(|_| ())
    }

    fn undo(&mut self) {
        self.undo_move();
    }

    fn is_terminal(&self) -> bool {
        self.is_game_over()
    }

    fn side_to_move(&self) -> Color {
        self.current_turn()
    }

    fn piece_at(&self, pos: Position) -> Option<Piece> {
        self.get_piece(pos).copied()
    }
}

/// A move that has been applied to a board and is taken back when the guard
/// goes out of scope, whether the caller returns normally, breaks out of a
/// loop or bails with `?`.
pub struct Applied<'a, B: SearchBoard + ?Sized> {
    board: &'a mut B,
}

impl<'a, B: SearchBoard + ?Sized> Applied<'a, B> {
    pub fn new(board: &'a mut B, mv: B::Move) -> Result<Self, MoveError> {
        board.apply(mv)?;
        Ok(Self { board })
    }
}

impl<B: SearchBoard + ?Sized> Deref for Applied<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        &*self.board
    }
}

impl<B: SearchBoard + ?Sized> DerefMut for Applied<'_, B> {
    fn deref_mut(&mut self) -> &mut B {
        &mut *self.board
    }
}

impl<B: SearchBoard + ?Sized> Drop for Applied<'_, B> {
    fn drop(&mut self) {
        self.board.undo();
    }
}
