use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use log::trace;

use crate::{
    error::MoveError,
    movegen::{self, PieceMap},
    piece::{Color, PieceType},
    Move, MoveResult, MoveType, Piece, Position,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self {
            white_kingside: true,
            white_queenside: true,
            black_kingside: true,
            black_queenside: true,
        }
    }
}

impl CastlingRights {
    pub fn none() -> Self {
        Self {
            white_kingside: false,
            white_queenside: false,
            black_kingside: false,
            black_queenside: false,
        }
    }

    pub fn allows(&self, color: Color, kingside: bool) -> bool {
        match (color, kingside) {
            (Color::White, true) => self.white_kingside,
            (Color::White, false) => self.white_queenside,
            (Color::Black, true) => self.black_kingside,
            (Color::Black, false) => self.black_queenside,
        }
    }

    fn revoke(&mut self, color: Color) {
        match color {
            Color::White => {
                self.white_kingside = false;
                self.white_queenside = false;
            }
            Color::Black => {
                self.black_kingside = false;
                self.black_queenside = false;
            }
        }
    }

    // A rook leaving or being captured on its home corner.
    fn revoke_corner(&mut self, pos: Position) {
        match (pos.file, pos.rank) {
            (1, 1) => self.white_queenside = false,
            (8, 1) => self.white_kingside = false,
            (1, 8) => self.black_queenside = false,
            (8, 8) => self.black_kingside = false,
            _ => {}
        }
    }

    fn update(&mut self, piece: Piece, chess_move: &Move) {
        if piece.piece_type == PieceType::King {
            self.revoke(piece.color);
        }
        self.revoke_corner(chess_move.from);
        self.revoke_corner(chess_move.to);
    }
}

/// Everything needed to take back one move.
#[derive(Debug, Clone, PartialEq)]
struct UndoState {
    mv: Move,
    piece: Piece,
    captured: Option<(Position, Piece)>,
    prev_castling_rights: CastlingRights,
    prev_en_passant: Option<Position>,
    prev_halfmove_clock: u32,
    prev_fullmove_number: u32,
    prev_last_move: Option<Move>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    pieces: HashMap<Position, Piece>,
    current_turn: Color,
    castling_rights: CastlingRights,
    en_passant: Option<Position>,
    halfmove_clock: u32,
    fullmove_number: u32,
    last_move: Option<Move>,
    history: Vec<UndoState>,
    position_keys: Vec<u64>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.setup_initial_position();
        board.position_keys.push(board.position_key());
        board
    }

    /// A board with no pieces, White to move and no castling rights.
    pub(crate) fn empty() -> Self {
        Self {
            pieces: HashMap::new(),
            current_turn: Color::White,
            castling_rights: CastlingRights::none(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            last_move: None,
            history: Vec::new(),
            position_keys: Vec::new(),
        }
    }

    /// Assembles a board from raw FEN fields.
    pub(crate) fn from_parts(
        pieces: PieceMap,
        current_turn: Color,
        castling_rights: CastlingRights,
        en_passant: Option<Position>,
        halfmove_clock: u32,
        fullmove_number: u32,
    ) -> Self {
        let mut board = Self {
            pieces,
            current_turn,
            castling_rights,
            en_passant,
            halfmove_clock,
            fullmove_number,
            ..Self::empty()
        };
        board.position_keys.push(board.position_key());
        board
    }

    fn setup_initial_position(&mut self) {
        for file in 1..=8 {
            self.pieces.insert(Position { file, rank: 2 }, Piece::new(PieceType::Pawn, Color::White));
            self.pieces.insert(Position { file, rank: 7 }, Piece::new(PieceType::Pawn, Color::Black));
        }

        let piece_order = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];

        for (file, &piece_type) in (1..=8).zip(piece_order.iter()) {
            self.pieces.insert(Position { file, rank: 1 }, Piece::new(piece_type, Color::White));
            self.pieces.insert(Position { file, rank: 8 }, Piece::new(piece_type, Color::Black));
        }

        self.current_turn = Color::White;
        self.castling_rights = CastlingRights::default();
    }

    pub fn get_piece(&self, pos: Position) -> Option<&Piece> {
        self.pieces.get(&pos)
    }

    pub fn get_all_pieces(&self) -> &HashMap<Position, Piece> {
        &self.pieces
    }

    pub fn current_turn(&self) -> Color {
        self.current_turn
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    pub fn en_passant(&self) -> Option<Position> {
        self.en_passant
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// Number of moves that can currently be taken back.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// All legal moves for the side to move, ordered by source square
    /// (a1..h8) and then by generation order.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        for pos in Position::all() {
            if let Some(&piece) = self.pieces.get(&pos) {
                if piece.color == self.current_turn {
                    self.push_legal_moves(pos, piece, &mut moves);
                }
            }
        }
        moves
    }

    /// Legal moves of the piece on `pos`; empty if it is not that piece's turn.
    pub fn get_valid_moves(&self, pos: Position) -> Vec<Move> {
        let mut moves = Vec::new();
        if let Some(&piece) = self.pieces.get(&pos) {
            if piece.color == self.current_turn {
                self.push_legal_moves(pos, piece, &mut moves);
            }
        }
        moves
    }

    fn push_legal_moves(&self, from: Position, piece: Piece, out: &mut Vec<Move>) {
        let mut candidates = Vec::new();
        movegen::pseudo_moves(&self.pieces, from, piece, self.en_passant, &mut candidates);
        if piece.piece_type == PieceType::King {
            self.push_castling_moves(from, piece.color, &mut candidates);
        }
        out.extend(
            candidates
                .into_iter()
                .filter(|mv| self.leaves_king_safe(mv, piece.color)),
        );
    }

    fn push_castling_moves(&self, from: Position, color: Color, out: &mut Vec<Move>) {
        let rank = color.back_rank();
        if from != (Position { file: 5, rank }) {
            return;
        }
        let enemy = color.opposite();
        if movegen::is_square_attacked(&self.pieces, from, enemy) {
            return;
        }

        // (kingside, rook file, squares that must be empty, squares the king crosses, king target file)
        let wings: [(bool, u8, &[u8], &[u8], u8); 2] = [
            (true, 8, &[6, 7], &[6], 7),
            (false, 1, &[2, 3, 4], &[4], 3),
        ];

        for (kingside, rook_file, empty_files, crossed_files, target_file) in wings {
            if !self.castling_rights.allows(color, kingside) {
                continue;
            }
            let rook_home = Position { file: rook_file, rank };
            if self.pieces.get(&rook_home) != Some(&Piece::new(PieceType::Rook, color)) {
                continue;
            }
            if empty_files
                .iter()
                .any(|&file| self.pieces.contains_key(&Position { file, rank }))
            {
                continue;
            }
            if crossed_files
                .iter()
                .any(|&file| movegen::is_square_attacked(&self.pieces, Position { file, rank }, enemy))
            {
                continue;
            }
            out.push(Move::castle(from, Position { file: target_file, rank }));
        }
    }

    fn leaves_king_safe(&self, chess_move: &Move, color: Color) -> bool {
        let mut after = self.pieces.clone();
        movegen::displace(&mut after, chess_move);
        match movegen::find_king(&after, color) {
            Some(king) => !movegen::is_square_attacked(&after, king, color.opposite()),
            None => true,
        }
    }

    fn has_legal_move(&self) -> bool {
        let mut moves = Vec::new();
        for pos in Position::all() {
            if let Some(&piece) = self.pieces.get(&pos) {
                if piece.color == self.current_turn {
                    self.push_legal_moves(pos, piece, &mut moves);
                    if !moves.is_empty() {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Plays `chess_move` if it is legal. The request is matched on
    /// from/to/promotion, so a bare `Move::new(from, to)` is enough for
    /// ordinary moves. On error the board is left untouched.
    pub fn make_move(&mut self, chess_move: Move) -> Result<MoveResult, MoveError> {
        let piece = *self
            .pieces
            .get(&chess_move.from)
            .ok_or(MoveError::EmptySquare(chess_move.from))?;

        if piece.color != self.current_turn {
            return Err(MoveError::WrongTurn { color: piece.color });
        }

        let legal = self
            .get_valid_moves(chess_move.from)
            .into_iter()
            .find(|candidate| candidate.matches(&chess_move))
            .ok_or(MoveError::Illegal(chess_move))?;

        Ok(self.play(legal, piece))
    }

    fn play(&mut self, chess_move: Move, piece: Piece) -> MoveResult {
        let capture_square = movegen::capture_square(&chess_move);
        let undo = UndoState {
            mv: chess_move,
            piece,
            captured: self.pieces.get(&capture_square).map(|victim| (capture_square, *victim)),
            prev_castling_rights: self.castling_rights,
            prev_en_passant: self.en_passant,
            prev_halfmove_clock: self.halfmove_clock,
            prev_fullmove_number: self.fullmove_number,
            prev_last_move: self.last_move,
        };

        let captured = movegen::displace(&mut self.pieces, &chess_move);

        self.castling_rights.update(piece, &chess_move);

        let rank_diff = (chess_move.to.rank as i8 - chess_move.from.rank as i8).abs();
        self.en_passant = if piece.piece_type == PieceType::Pawn && rank_diff == 2 {
            chess_move.from.offset(0, piece.color.pawn_direction())
        } else {
            None
        };

        if piece.piece_type == PieceType::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if piece.color == Color::Black {
            self.fullmove_number += 1;
        }

        self.current_turn = self.current_turn.opposite();
        self.last_move = Some(chess_move);
        self.history.push(undo);
        self.position_keys.push(self.position_key());

        trace!("played {chess_move}");

        MoveResult {
            mv: chess_move,
            piece,
            captured,
        }
    }

    /// Takes back the most recent move, restoring the full prior state.
    /// Returns `None` when there is nothing to undo.
    pub fn undo_move(&mut self) -> Option<Move> {
        let undo = self.history.pop()?;
        self.position_keys.pop();

        let chess_move = undo.mv;
        self.pieces.remove(&chess_move.to);
        self.pieces.insert(chess_move.from, undo.piece);

        if chess_move.move_type == MoveType::Castle {
            let (rook_from, rook_to) = movegen::castle_rook_squares(&chess_move);
            if let Some(rook) = self.pieces.remove(&rook_to) {
                self.pieces.insert(rook_from, rook);
            }
        }

        if let Some((square, victim)) = undo.captured {
            self.pieces.insert(square, victim);
        }

        self.current_turn = undo.piece.color;
        self.castling_rights = undo.prev_castling_rights;
        self.en_passant = undo.prev_en_passant;
        self.halfmove_clock = undo.prev_halfmove_clock;
        self.fullmove_number = undo.prev_fullmove_number;
        self.last_move = undo.prev_last_move;

        Some(chess_move)
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        match movegen::find_king(&self.pieces, color) {
            Some(king) => movegen::is_square_attacked(&self.pieces, king, color.opposite()),
            None => false,
        }
    }

    /// Whether the side to move is in check.
    pub fn is_check(&self) -> bool {
        self.is_in_check(self.current_turn)
    }

    pub fn is_position_under_attack(&self, pos: Position, defending_color: Color) -> bool {
        movegen::is_square_attacked(&self.pieces, pos, defending_color.opposite())
    }

    pub fn is_checkmate(&self) -> bool {
        self.is_check() && !self.has_legal_move()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.is_check() && !self.has_legal_move()
    }

    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= 100
    }

    pub fn is_threefold_repetition(&self) -> bool {
        match self.position_keys.last() {
            Some(current) => self.position_keys.iter().filter(|key| *key == current).count() >= 3,
            None => false,
        }
    }

    /// Neither side can possibly mate: bare kings, a single minor piece, or
    /// only bishops that all stand on squares of one color.
    pub fn has_insufficient_material(&self) -> bool {
        let mut minors = Vec::new();
        for (pos, piece) in &self.pieces {
            match piece.piece_type {
                PieceType::King => {}
                PieceType::Bishop | PieceType::Knight => minors.push((*pos, *piece)),
                _ => return false,
            }
        }

        if minors.len() <= 1 {
            return true;
        }

        let all_bishops = minors.iter().all(|(_, p)| p.piece_type == PieceType::Bishop);
        let first_light = minors[0].0.is_light();
        all_bishops && minors.iter().all(|(pos, _)| pos.is_light() == first_light)
    }

    pub fn is_draw(&self) -> bool {
        self.is_fifty_move_draw()
            || self.has_insufficient_material()
            || self.is_threefold_repetition()
            || self.is_stalemate()
    }

    pub fn is_game_over(&self) -> bool {
        !self.has_legal_move()
            || self.is_fifty_move_draw()
            || self.has_insufficient_material()
            || self.is_threefold_repetition()
    }

    /// The en passant square, but only when a pawn of the side to move
    /// stands next to it and could capture there.
    fn capturable_en_passant(&self) -> Option<Position> {
        let target = self.en_passant?;
        let behind = -self.current_turn.pawn_direction();
        let capturer = Piece::new(PieceType::Pawn, self.current_turn);
        [-1, 1]
            .into_iter()
            .filter_map(|df| target.offset(df, behind))
            .any(|pos| self.pieces.get(&pos) == Some(&capturer))
            .then_some(target)
    }

    fn position_key(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for pos in Position::all() {
            self.pieces.get(&pos).hash(&mut hasher);
        }
        self.current_turn.hash(&mut hasher);
        self.castling_rights.hash(&mut hasher);
        self.capturable_en_passant().hash(&mut hasher);
        hasher.finish()
    }
}
