//! Test doubles and reference implementations shared by the engine tests.

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;

use chess_core::{Board, Color, Move, MoveError, Piece, Position};
use chess_engine::{evaluate_position, SearchBoard, Score};
use rand::RngCore;

/// Wraps a real board and counts how often the search touches it.
pub struct CountingBoard {
    pub inner: Board,
    pub legal_move_calls: Cell<usize>,
    pub applies: usize,
}

impl CountingBoard {
    pub fn new(inner: Board) -> Self {
        Self { inner, legal_move_calls: Cell::new(0), applies: 0 }
    }
}

impl SearchBoard for CountingBoard {
    type Move = Move;

    fn legal_moves(&self) -> Vec<Move> {
        self.legal_move_calls.set(self.legal_move_calls.get() + 1);
        self.inner.legal_moves()
    }

    fn apply(&mut self, mv: Move) -> Result<(), MoveError> {
        self.applies += 1;
        SearchBoard::apply(&mut self.inner, mv)
    }

    fn undo(&mut self) {
        SearchBoard::undo(&mut self.inner);
    }

    fn is_terminal(&self) -> bool {
        self.inner.is_game_over()
    }

    fn side_to_move(&self) -> Color {
        self.inner.current_turn()
    }

    fn piece_at(&self, pos: Position) -> Option<Piece> {
        self.inner.get_piece(pos).copied()
    }
}

/// A board whose rules engine starts rejecting moves after a number of
/// successful applies.
pub struct FlakyBoard {
    pub inner: Board,
    pub successes_left: usize,
}

impl SearchBoard for FlakyBoard {
    type Move = Move;

    fn legal_moves(&self) -> Vec<Move> {
        self.inner.legal_moves()
    }

    fn apply(&mut self, mv: Move) -> Result<(), MoveError> {
        if self.successes_left == 0 {
            return Err(MoveError::Illegal(mv));
        }
        self.successes_left -= 1;
        SearchBoard::apply(&mut self.inner, mv)
    }

    fn undo(&mut self) {
        SearchBoard::undo(&mut self.inner);
    }

    fn is_terminal(&self) -> bool {
        self.inner.is_game_over()
    }

    fn side_to_move(&self) -> Color {
        self.inner.current_turn()
    }

    fn piece_at(&self, pos: Position) -> Option<Piece> {
        self.inner.get_piece(pos).copied()
    }
}

/// Hands out a fixed list of values, then zeros.
pub struct ScriptedRng {
    values: VecDeque<u64>,
}

impl ScriptedRng {
    pub fn new(values: &[u64]) -> Self {
        Self { values: values.iter().copied().collect() }
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.values.pop_front().unwrap_or(0)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Plain minimax without pruning. Returns the value and the number of
/// positions visited.
pub fn minimax(board: &mut Board, depth: u8, maximizing: bool) -> (Score, u64) {
    if depth == 0 || board.is_game_over() {
        return (evaluate_position(&*board), 1);
    }
    let moves = board.legal_moves();
    if moves.is_empty() {
        return (evaluate_position(&*board), 1);
    }

    let mut nodes = 1;
    let mut best = if maximizing { Score::MIN } else { Score::MAX };
    for mv in moves {
        board.make_move(mv).unwrap();
        let (value, visited) = minimax(board, depth - 1, !maximizing);
        board.undo_move();
        nodes += visited;
        best = if maximizing { best.max(value) } else { best.min(value) };
    }
    (best, nodes)
}

/// Best root move by plain minimax, first in move order on ties.
pub fn minimax_root(board: &mut Board, depth: u8) -> (Move, Score) {
    let maximizing = board.current_turn() == Color::White;
    let mut best: Option<(Move, Score)> = None;
    for mv in board.legal_moves() {
        board.make_move(mv).unwrap();
        let (value, _) = minimax(board, depth - 1, !maximizing);
        board.undo_move();
        let better = match best {
            None => true,
            Some((_, b)) if maximizing => value > b,
            Some((_, b)) => value < b,
        };
        if better {
            best = Some((mv, value));
        }
    }
    best.unwrap()
}

/// Colour-flipped copy of a FEN: ranks reversed, piece colours and side to
/// move swapped. Only handles positions without castling or en passant
/// rights.
pub fn mirror_fen(fen: &str) -> String {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    let placement: Vec<String> = fields[0]
        .split('/')
        .rev()
        .map(|row| {
            row.chars()
                .map(|c| if c.is_ascii_uppercase() { c.to_ascii_lowercase() } else { c.to_ascii_uppercase() })
                .collect()
        })
        .collect();
    let side = if fields[1] == "w" { "b" } else { "w" };
    format!("{} {} - - 0 1", placement.join("/"), side)
}
