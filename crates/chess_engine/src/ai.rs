use chess_core::{Board, Move};
use log::{info, trace};
use rand::{Rng, RngCore};

use crate::board::SearchBoard;
use crate::difficulty::Difficulty;
use crate::error::SearchError;
use crate::search::choose_move;

/// Picks a move for the side to move on `board` at the given difficulty.
///
/// `legal_moves` is the caller's view of the legal moves; when it is empty
/// the answer is `None` and nothing is searched. Otherwise the Easy tier may
/// return one of `legal_moves` at random, and every tier then searches
/// `board` to the tier's depth.
///
/// All randomness comes from `rng`. Passing `None` turns it off: no random
/// Easy moves and no shuffling of equally good moves. The board is returned
/// in the state it was given, also when an error is returned.
pub fn best_move<B: SearchBoard + ?Sized>(
    board: &mut B,
    difficulty: Difficulty,
    legal_moves: &[B::Move],
    mut rng: Option<&mut dyn RngCore>,
) -> Result<Option<B::Move>, SearchError> {
    if legal_moves.is_empty() {
        return Ok(None);
    }

    let policy = difficulty.policy();
    if let Some(rng) = rng.as_deref_mut() {
        if policy.random_move_chance > 0.0 && rng.gen::<f64>() < policy.random_move_chance {
            let mv = legal_moves[rng.gen_range(0..legal_moves.len())];
            trace!("{difficulty}: skipping search, random move {mv}");
            return Ok(Some(mv));
        }
    }

    let outcome = choose_move(board, policy.depth, rng)?;
    Ok(outcome.map(|outcome| outcome.best_move))
}

/// Computer opponent bound to one difficulty tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChessAI {
    difficulty: Difficulty,
}

impl ChessAI {
    pub fn new(difficulty: Difficulty) -> Self {
        Self { difficulty }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    /// Chooses a move for the side to move using the thread-local RNG.
    pub fn get_move(&self, board: &Board) -> Result<Option<Move>, SearchError> {
        self.get_move_with_rng(board, &mut rand::thread_rng())
    }

    /// Searches a private copy of `board` so the caller's board can stay on
    /// another thread.
    pub fn get_move_with_rng(
        &self,
        board: &Board,
        rng: &mut dyn RngCore,
    ) -> Result<Option<Move>, SearchError> {
        let mut scratch = board.clone();
        let legal_moves = scratch.legal_moves();
        let chosen = best_move(&mut scratch, self.difficulty, &legal_moves, Some(rng))?;

        match chosen {
            Some(mv) => info!("{} AI plays {mv}", self.difficulty),
            None => info!("{} AI has no legal move", self.difficulty),
        }
        Ok(chosen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn ai_returns_a_legal_move() {
        let board = Board::new();
        for difficulty in Difficulty::ALL {
            let ai = ChessAI::new(difficulty);
            let mv = ai
                .get_move_with_rng(&board, &mut StdRng::seed_from_u64(3))
                .unwrap()
                .unwrap();
            assert!(board.legal_moves().contains(&mv), "{difficulty}: {mv}");
        }
    }

    #[test]
    fn ai_leaves_callers_board_alone() {
        let board = Board::new();
        let before = board.clone();
        ChessAI::default().get_move(&board).unwrap();
        assert_eq!(board, before);
    }

    #[test]
    fn ai_reports_no_move_when_mated() {
        let mut board = Board::new();
        for mv in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            board.make_move(mv.parse().unwrap()).unwrap();
        }
        assert_eq!(ChessAI::new(Difficulty::Hard).get_move(&board), Ok(None));
    }
}
