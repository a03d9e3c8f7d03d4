//! Fixed-depth minimax with alpha-beta pruning.
//!
//! Scores are always from White's point of view: White maximizes, Black
//! minimizes. A single board is walked depth first; every applied move is
//! held by an [`Applied`] guard so it is undone on every exit path.

use chess_core::piece::Color;
use log::debug;
use rand::{seq::SliceRandom, RngCore};

use crate::board::{Applied, SearchBoard};
use crate::error::SearchError;
use crate::evaluation::{evaluate_position, Score};

/// Bound used for the initial alpha/beta window. Symmetric so negating it
/// never overflows.
pub const INFINITY: Score = Score::MAX;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Positions visited, leaves included.
    pub nodes: u64,
    /// Times a beta <= alpha cutoff skipped the remaining siblings.
    pub cutoffs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOutcome<M> {
    pub best_move: M,
    pub score: Score,
    pub stats: SearchStats,
}

/// Minimax value of `board` searched `depth` plies deep within the
/// `(alpha, beta)` window.
pub fn search<B: SearchBoard + ?Sized>(
    board: &mut B,
    depth: u8,
    alpha: Score,
    beta: Score,
    maximizing: bool,
) -> Result<Score, SearchError> {
    alpha_beta(board, depth, alpha, beta, maximizing, &mut SearchStats::default())
}

/// [`search`] that also records how much work was done.
pub fn alpha_beta<B: SearchBoard + ?Sized>(
    board: &mut B,
    depth: u8,
    mut alpha: Score,
    mut beta: Score,
    maximizing: bool,
    stats: &mut SearchStats,
) -> Result<Score, SearchError> {
    stats.nodes += 1;

    // No mate bonus: a finished game is scored like any other position.
    if depth == 0 || board.is_terminal() {
        return Ok(evaluate_position(&*board));
    }

    let moves = board.legal_moves();
    if moves.is_empty() {
        return Ok(evaluate_position(&*board));
    }

    if maximizing {
        let mut best = -INFINITY;
        for mv in moves {
            let value = {
                let mut child = Applied::new(board, mv)?;
                alpha_beta(&mut *child, depth - 1, alpha, beta, false, stats)?
            };
            best = best.max(value);
            alpha = alpha.max(value);
            if beta <= alpha {
                stats.cutoffs += 1;
                break;
            }
        }
        Ok(best)
    } else {
        let mut best = INFINITY;
        for mv in moves {
            let value = {
                let mut child = Applied::new(board, mv)?;
                alpha_beta(&mut *child, depth - 1, alpha, beta, true, stats)?
            };
            best = best.min(value);
            beta = beta.min(value);
            if beta <= alpha {
                stats.cutoffs += 1;
                break;
            }
        }
        Ok(best)
    }
}

/// Searches every root move and returns the one with the best score for the
/// side to move, or `None` when there are no legal moves.
///
/// Root moves are shuffled with `rng` first so equally scored moves are not
/// always resolved the same way; among equal scores the first one in the
/// (shuffled) order wins. Without an `rng` the rules engine's order is kept.
/// A `depth` of 0 is treated as 1.
pub fn choose_move<B: SearchBoard + ?Sized>(
    board: &mut B,
    depth: u8,
    rng: Option<&mut dyn RngCore>,
) -> Result<Option<SearchOutcome<B::Move>>, SearchError> {
    let mut moves = board.legal_moves();
    if moves.is_empty() {
        return Ok(None);
    }
    if let Some(rng) = rng {
        moves.shuffle(rng);
    }

    let depth = depth.max(1);
    let maximizing = board.side_to_move() == Color::White;
    let mut stats = SearchStats::default();
    let mut best: Option<(B::Move, Score)> = None;

    for mv in moves {
        let value = {
            let mut child = Applied::new(board, mv)?;
            alpha_beta(&mut *child, depth - 1, -INFINITY, INFINITY, !maximizing, &mut stats)?
        };

        let improves = match best {
            None => true,
            Some((_, best_value)) if maximizing => value > best_value,
            Some((_, best_value)) => value < best_value,
        };
        if improves {
            best = Some((mv, value));
        }
    }

    Ok(best.map(|(best_move, score)| {
        debug!(
            "depth {depth}: {best_move} scores {score} ({} nodes, {} cutoffs)",
            stats.nodes, stats.cutoffs
        );
        SearchOutcome { best_move, score, stats }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Board;

    #[test]
    fn depth_zero_is_static_eval() {
        let mut board = Board::from_fen("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1").unwrap();
        let expected = evaluate_position(&board);
        for maximizing in [true, false] {
            assert_eq!(search(&mut board, 0, -INFINITY, INFINITY, maximizing), Ok(expected));
        }
    }

    #[test]
    fn choose_move_returns_none_without_moves() {
        let mut board = Board::from_fen("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(choose_move(&mut board, 2, None), Ok(None));
    }

    #[test]
    fn zero_depth_root_still_searches_one_ply() {
        let mut board = Board::from_fen("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1").unwrap();
        let outcome = choose_move(&mut board, 0, None).unwrap().unwrap();
        assert_eq!(outcome.best_move.to_string(), "e4d5");
    }
}
