use chess_core::{piece::{Color, PieceType}, Position};

use crate::board::SearchBoard;

/// Centipawns, positive when White is better, negative when Black is,
/// regardless of whose turn it is.
pub type Score = i32;

// Standard piece values used in chess engines, measured in centipawns (100 = 1 pawn)
pub const PAWN_VALUE: Score = 100;
pub const KNIGHT_VALUE: Score = 320;
pub const BISHOP_VALUE: Score = 330;
pub const ROOK_VALUE: Score = 500;
pub const QUEEN_VALUE: Score = 900;
// Keeps material sums stable; mate is detected by the rules, not by this number.
pub const KING_VALUE: Score = 20000;

// Piece-square tables give bonuses/penalties for piece placement.
// Rows run from the 8th rank (row 0) down to the 1st (row 7) as seen by White;
// Black reads the same table with the rank mirrored.

// Pawn position table:
// - Encourages pawns to advance (higher values in ranks 4,5)
// - Rewards central pawns (higher values in d,e files)
const PAWN_TABLE: [[Score; 8]; 8] = [
    [0,  0,  0,  0,  0,  0,  0,  0],    // 8th rank (promotion)
    [50, 50, 50, 50, 50, 50, 50, 50],   // 7th rank (near promotion)
    [10, 10, 20, 30, 30, 20, 10, 10],   // 6th rank
    [5,  5, 10, 25, 25, 10,  5,  5],    // 5th rank (center control)
    [0,  0,  0, 20, 20,  0,  0,  0],    // 4th rank
    [5, -5,-10,  0,  0,-10, -5,  5],    // 3rd rank
    [5, 10, 10,-20,-20, 10, 10,  5],    // 2nd rank (starting position)
    [0,  0,  0,  0,  0,  0,  0,  0]     // 1st rank
];

// Knight position table:
// - Encourages knights to control center
// - Penalizes edge positions
const KNIGHT_TABLE: [[Score; 8]; 8] = [
    [-50,-40,-30,-30,-30,-30,-40,-50],
    [-40,-20,  0,  0,  0,  0,-20,-40],
    [-30,  0, 10, 15, 15, 10,  0,-30],
    [-30,  5, 15, 20, 20, 15,  5,-30],
    [-30,  0, 15, 20, 20, 15,  0,-30],
    [-30,  5, 10, 15, 15, 10,  5,-30],
    [-40,-20,  0,  5,  5,  0,-20,-40],
    [-50,-40,-30,-30,-30,-30,-40,-50]
];

// Bishop position table:
// - Rewards long diagonals and the center
const BISHOP_TABLE: [[Score; 8]; 8] = [
    [-20,-10,-10,-10,-10,-10,-10,-20],
    [-10,  0,  0,  0,  0,  0,  0,-10],
    [-10,  0,  5, 10, 10,  5,  0,-10],
    [-10,  5,  5, 10, 10,  5,  5,-10],
    [-10,  0, 10, 10, 10, 10,  0,-10],
    [-10, 10, 10, 10, 10, 10, 10,-10],
    [-10,  5,  0,  0,  0,  0,  5,-10],
    [-20,-10,-10,-10,-10,-10,-10,-20]
];

// Rook position table:
// - 7th rank bonus, slight preference for central files at home
const ROOK_TABLE: [[Score; 8]; 8] = [
    [0,  0,  0,  0,  0,  0,  0,  0],
    [5, 10, 10, 10, 10, 10, 10,  5],
    [-5,  0,  0,  0,  0,  0,  0, -5],
    [-5,  0,  0,  0,  0,  0,  0, -5],
    [-5,  0,  0,  0,  0,  0,  0, -5],
    [-5,  0,  0,  0,  0,  0,  0, -5],
    [-5,  0,  0,  0,  0,  0,  0, -5],
    [0,  0,  0,  5,  5,  0,  0,  0]
];

// Queen position table
const QUEEN_TABLE: [[Score; 8]; 8] = [
    [-20,-10,-10, -5, -5,-10,-10,-20],
    [-10,  0,  0,  0,  0,  0,  0,-10],
    [-10,  0,  5,  5,  5,  5,  0,-10],
    [-5,  0,  5,  5,  5,  5,  0, -5],
    [0,  0,  5,  5,  5,  5,  0, -5],
    [-10,  5,  5,  5,  5,  5,  0,-10],
    [-10,  0,  5,  0,  0,  0,  0,-10],
    [-20,-10,-10, -5, -5,-10,-10,-20]
];

// King table:
// - Heavy penalties for central positions
// - Bonus for castled squares on the home rank
const KING_TABLE: [[Score; 8]; 8] = [
    [-30,-40,-40,-50,-50,-40,-40,-30],
    [-30,-40,-40,-50,-50,-40,-40,-30],
    [-30,-40,-40,-50,-50,-40,-40,-30],
    [-30,-40,-40,-50,-50,-40,-40,-30],
    [-20,-30,-30,-40,-40,-30,-30,-20],
    [-10,-20,-20,-20,-20,-20,-20,-10],
    [20, 20,  0,  0,  0,  0, 20, 20],
    [20, 30, 10,  0,  0, 10, 30, 20]
];

/// Material plus piece-square score of a position from White's point of view.
///
/// Pure function of the piece placement: side to move, check status and
/// game-over state are not consulted.
pub fn evaluate_position<B: SearchBoard + ?Sized>(board: &B) -> Score {
    let mut score = 0;

    for pos in Position::all() {
        let Some(piece) = board.piece_at(pos) else {
            continue;
        };
        let value = get_piece_value(piece.piece_type) + get_position_bonus(piece.piece_type, pos, piece.color);
        match piece.color {
            Color::White => score += value,
            Color::Black => score -= value,
        }
    }

    score
}

/// Returns the base material value of a piece
pub fn get_piece_value(piece_type: PieceType) -> Score {
    match piece_type {
        PieceType::Pawn => PAWN_VALUE,
        PieceType::Knight => KNIGHT_VALUE,
        PieceType::Bishop => BISHOP_VALUE,
        PieceType::Rook => ROOK_VALUE,
        PieceType::Queen => QUEEN_VALUE,
        PieceType::King => KING_VALUE,
    }
}

/// Piece-square bonus for a piece of `color` on `pos`. Only the rank is
/// mirrored for Black; files are read as-is.
pub fn get_position_bonus(piece_type: PieceType, pos: Position, color: Color) -> Score {
    let rank_idx = match color {
        Color::White => 8 - pos.rank as usize,
        Color::Black => pos.rank as usize - 1,
    };
    let file_idx = pos.file as usize - 1;

    let table = match piece_type {
        PieceType::Pawn => &PAWN_TABLE,
        PieceType::Knight => &KNIGHT_TABLE,
        PieceType::Bishop => &BISHOP_TABLE,
        PieceType::Rook => &ROOK_TABLE,
        PieceType::Queen => &QUEEN_TABLE,
        PieceType::King => &KING_TABLE,
    };
    table[rank_idx][file_idx]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Board;

    fn eval(fen: &str) -> Score {
        evaluate_position(&Board::from_fen(fen).unwrap())
    }

    #[test]
    fn start_position_is_balanced() {
        assert_eq!(evaluate_position(&Board::new()), 0);
    }

    #[test]
    fn empty_board_scores_zero() {
        assert_eq!(eval("8/8/8/8/8/8/8/8 w - - 0 1"), 0);
    }

    #[test]
    fn extra_white_pawn_adds_value_and_bonus() {
        let baseline = eval("4k3/8/8/8/8/8/8/4K3 w - - 0 1");
        let with_pawn = eval("4k3/8/8/8/8/P7/8/4K3 w - - 0 1");
        // a3 sits on the 3rd rank row of the pawn table: +5.
        assert_eq!(with_pawn - baseline, PAWN_VALUE + 5);
        assert!(with_pawn > baseline);
    }

    #[test]
    fn side_to_move_does_not_matter() {
        let white = eval("4k3/8/8/3q4/8/8/8/4K3 w - - 0 1");
        let black = eval("4k3/8/8/3q4/8/8/8/4K3 b - - 0 1");
        assert_eq!(white, black);
        assert!(white < 0);
    }

    #[test]
    fn black_reads_tables_with_rank_mirrored() {
        for piece_type in PieceType::ALL {
            for pos in Position::all() {
                assert_eq!(
                    get_position_bonus(piece_type, pos, Color::White),
                    get_position_bonus(piece_type, pos.flip_rank(), Color::Black),
                );
            }
        }
    }

    #[test]
    fn handles_unusual_material() {
        // Three white queens against a lone king; both kings sit on e-file zeros.
        let score = eval("4k3/8/8/8/8/8/8/QQQ1K3 w - - 0 1");
        assert_eq!(score, 3 * QUEEN_VALUE - 20 - 10 - 10);
    }
}
