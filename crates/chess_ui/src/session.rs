//! Game flow behind the board view: whose turn it is, what the player has
//! selected, what has been captured and what the status line says. Holds no
//! Bevy types so it can be driven directly from tests.

use chess_core::{
    piece::{Color, PieceType},
    Board, Move, MoveError, MoveResult, Position,
};
use chess_engine::Difficulty;

/// In single player games the human always has White.
pub const HUMAN_COLOR: Color = Color::White;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    #[default]
    PlayerVsComputer,
    PlayerVsPlayer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    Selected(Position),
    Deselected,
    Moved(MoveResult),
}

#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    mode: GameMode,
    difficulty: Difficulty,
    selected: Option<Position>,
    captured_white: Vec<PieceType>,
    captured_black: Vec<PieceType>,
    thinking: bool,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(GameMode::default(), Difficulty::default())
    }
}

impl GameSession {
    pub fn new(mode: GameMode, difficulty: Difficulty) -> Self {
        Self::from_board(Board::new(), mode, difficulty)
    }

    pub fn from_board(board: Board, mode: GameMode, difficulty: Difficulty) -> Self {
        Self {
            board,
            mode,
            difficulty,
            selected: None,
            captured_white: Vec::new(),
            captured_black: Vec::new(),
            thinking: false,
        }
    }

    /// Starts a fresh game, keeping mode and difficulty.
    pub fn reset(&mut self) {
        *self = Self::new(self.mode, self.difficulty);
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn selected(&self) -> Option<Position> {
        self.selected
    }

    pub fn last_move(&self) -> Option<Move> {
        self.board.last_move()
    }

    pub fn is_game_over(&self) -> bool {
        self.board.is_game_over()
    }

    pub fn is_computer_turn(&self) -> bool {
        self.mode == GameMode::PlayerVsComputer && self.board.current_turn() != HUMAN_COLOR
    }

    pub fn is_thinking(&self) -> bool {
        self.thinking
    }

    pub fn set_thinking(&mut self, thinking: bool) {
        self.thinking = thinking;
    }

    pub fn accepts_input(&self) -> bool {
        !self.is_game_over() && !self.thinking && !self.is_computer_turn()
    }

    /// Handles a click on `pos`.
    ///
    /// Clicking one of the mover's pieces selects it, or clears the selection
    /// if it was already selected. Any other square tries to move the
    /// selected piece there, promoting to a queen when a pawn reaches the last
    /// rank. A square the piece cannot reach just clears the selection.
    pub fn click(&mut self, pos: Position) -> ClickOutcome {
        if !self.accepts_input() {
            return ClickOutcome::Ignored;
        }

        let turn = self.board.current_turn();
        if self.board.get_piece(pos).is_some_and(|piece| piece.color == turn) {
            if self.selected == Some(pos) {
                self.selected = None;
                return ClickOutcome::Deselected;
            }
            self.selected = Some(pos);
            return ClickOutcome::Selected(pos);
        }

        let Some(from) = self.selected.take() else {
            return ClickOutcome::Ignored;
        };
        match self.find_move(from, pos) {
            Some(mv) => match self.play(mv) {
                Ok(result) => ClickOutcome::Moved(result),
                Err(_) => ClickOutcome::Deselected,
            },
            None => ClickOutcome::Deselected,
        }
    }

    fn find_move(&self, from: Position, to: Position) -> Option<Move> {
        self.board
            .get_valid_moves(from)
            .into_iter()
            .filter(|mv| mv.to == to)
            .find(|mv| matches!(mv.promotion, None | Some(PieceType::Queen)))
    }

    /// Destination squares of the selected piece.
    pub fn targets(&self) -> Vec<Position> {
        let Some(from) = self.selected else {
            return Vec::new();
        };
        let mut targets = Vec::new();
        for mv in self.board.get_valid_moves(from) {
            if !targets.contains(&mv.to) {
                targets.push(mv.to);
            }
        }
        targets
    }

    /// Plays `mv` for whoever is to move and records any capture.
    pub fn play(&mut self, mv: Move) -> Result<MoveResult, MoveError> {
        let result = self.board.make_move(mv)?;
        if let Some(captured) = result.captured {
            match captured.color {
                Color::White => self.captured_white.push(captured.piece_type),
                Color::Black => self.captured_black.push(captured.piece_type),
            }
        }
        self.selected = None;
        Ok(result)
    }

    /// Pieces of `color` that have been taken, in capture order.
    pub fn captured(&self, color: Color) -> &[PieceType] {
        match color {
            Color::White => &self.captured_white,
            Color::Black => &self.captured_black,
        }
    }

    /// Square of the king that is in check, if any.
    pub fn check_square(&self) -> Option<Position> {
        if !self.board.is_check() {
            return None;
        }
        let turn = self.board.current_turn();
        self.board
            .get_all_pieces()
            .iter()
            .find(|(_, piece)| piece.piece_type == PieceType::King && piece.color == turn)
            .map(|(&pos, _)| pos)
    }

    pub fn status(&self) -> &'static str {
        let white_to_move = self.board.current_turn() == Color::White;
        let vs_computer = self.mode == GameMode::PlayerVsComputer;

        if self.board.is_checkmate() {
            return match (vs_computer, white_to_move) {
                (true, true) => "Game Over",
                (true, false) => "Victory",
                (false, true) => "Black Wins",
                (false, false) => "White Wins",
            };
        }
        if self.board.is_draw() {
            return "Stalemate";
        }
        if self.board.is_check() {
            return "Check";
        }
        match (vs_computer, white_to_move) {
            (true, true) => "Your Move",
            (true, false) => "Thinking...",
            (false, true) => "White's Turn",
            (false, false) => "Black's Turn",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Position {
        name.parse().unwrap()
    }

    fn session(fen: &str, mode: GameMode) -> GameSession {
        GameSession::from_board(Board::from_fen(fen).unwrap(), mode, Difficulty::Medium)
    }

    #[test]
    fn new_game_statuses() {
        assert_eq!(GameSession::new(GameMode::PlayerVsComputer, Difficulty::Easy).status(), "Your Move");
        assert_eq!(GameSession::new(GameMode::PlayerVsPlayer, Difficulty::Easy).status(), "White's Turn");
    }

    #[test]
    fn select_then_move() {
        let mut game = GameSession::default();
        assert_eq!(game.click(sq("e2")), ClickOutcome::Selected(sq("e2")));

        let mut targets = game.targets();
        targets.sort_by_key(|pos| pos.rank);
        assert_eq!(targets, vec![sq("e3"), sq("e4")]);

        assert!(matches!(game.click(sq("e4")), ClickOutcome::Moved(_)));
        assert_eq!(game.selected(), None);
        assert_eq!(game.last_move().map(|mv| mv.to), Some(sq("e4")));
    }

    #[test]
    fn computer_turn_blocks_input() {
        let mut game = GameSession::default();
        game.click(sq("e2"));
        game.click(sq("e4"));

        assert!(game.is_computer_turn());
        assert_eq!(game.status(), "Thinking...");
        assert_eq!(game.click(sq("e7")), ClickOutcome::Ignored);
    }

    #[test]
    fn thinking_blocks_input() {
        let mut game = GameSession::new(GameMode::PlayerVsPlayer, Difficulty::Medium);
        game.set_thinking(true);
        assert_eq!(game.click(sq("e2")), ClickOutcome::Ignored);
        game.set_thinking(false);
        assert_eq!(game.click(sq("e2")), ClickOutcome::Selected(sq("e2")));
    }

    #[test]
    fn players_alternate_in_multiplayer() {
        let mut game = GameSession::new(GameMode::PlayerVsPlayer, Difficulty::Medium);
        game.click(sq("e2"));
        game.click(sq("e4"));
        assert!(!game.is_computer_turn());
        assert_eq!(game.status(), "Black's Turn");
        assert_eq!(game.click(sq("e7")), ClickOutcome::Selected(sq("e7")));
    }

    #[test]
    fn clicking_again_or_elsewhere_deselects() {
        let mut game = GameSession::default();
        game.click(sq("g1"));
        assert_eq!(game.click(sq("g1")), ClickOutcome::Deselected);

        game.click(sq("g1"));
        assert_eq!(game.click(sq("g4")), ClickOutcome::Deselected);
        assert_eq!(game.selected(), None);
        assert!(game.targets().is_empty());

        assert_eq!(game.click(sq("e5")), ClickOutcome::Ignored);
    }

    #[test]
    fn switching_selection_between_own_pieces() {
        let mut game = GameSession::default();
        game.click(sq("g1"));
        assert_eq!(game.click(sq("b1")), ClickOutcome::Selected(sq("b1")));
        assert_eq!(game.selected(), Some(sq("b1")));
    }

    #[test]
    fn pawns_promote_to_queens() {
        let mut game = session("8/P6k/8/8/8/8/8/K7 w - - 0 1", GameMode::PlayerVsPlayer);
        game.click(sq("a7"));
        assert_eq!(game.targets(), vec![sq("a8")]);
        game.click(sq("a8"));
        let piece = game.board().get_piece(sq("a8")).copied().unwrap();
        assert_eq!(piece.piece_type, PieceType::Queen);
        assert_eq!(piece.color, Color::White);
    }

    #[test]
    fn captures_are_kept_by_colour() {
        let mut game = GameSession::new(GameMode::PlayerVsPlayer, Difficulty::Medium);
        for mv in ["e2e4", "d7d5", "e4d5", "d8d5"] {
            game.play(mv.parse().unwrap()).unwrap();
        }
        assert_eq!(game.captured(Color::Black), &[PieceType::Pawn]);
        assert_eq!(game.captured(Color::White), &[PieceType::Pawn]);

        game.reset();
        assert!(game.captured(Color::Black).is_empty());
        assert!(game.captured(Color::White).is_empty());
        assert_eq!(game.board(), &Board::new());
        assert_eq!(game.mode(), GameMode::PlayerVsPlayer);
    }

    #[test]
    fn illegal_play_changes_nothing() {
        let mut game = GameSession::default();
        assert!(game.play("e2e5".parse().unwrap()).is_err());
        assert_eq!(game.board(), &Board::new());
    }

    #[test]
    fn checkmate_statuses() {
        let white_mated = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3";
        let black_mated = "3R2k1/5ppp/8/8/8/8/8/6K1 b - - 1 1";

        assert_eq!(session(white_mated, GameMode::PlayerVsComputer).status(), "Game Over");
        assert_eq!(session(black_mated, GameMode::PlayerVsComputer).status(), "Victory");
        assert_eq!(session(white_mated, GameMode::PlayerVsPlayer).status(), "Black Wins");
        assert_eq!(session(black_mated, GameMode::PlayerVsPlayer).status(), "White Wins");

        let mut game = session(white_mated, GameMode::PlayerVsPlayer);
        assert_eq!(game.click(sq("e2")), ClickOutcome::Ignored);
    }

    #[test]
    fn draw_and_check_statuses() {
        let stalemate = session("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1", GameMode::PlayerVsPlayer);
        assert_eq!(stalemate.status(), "Stalemate");

        let check = session("4k3/8/8/8/8/8/8/4R1K1 b - - 0 1", GameMode::PlayerVsPlayer);
        assert_eq!(check.status(), "Check");
        assert_eq!(check.check_square(), Some(sq("e8")));
        assert_eq!(GameSession::default().check_square(), None);
    }
}
