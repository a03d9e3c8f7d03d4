//! Pseudo-legal move generation and attack detection.
//!
//! Everything here works on a bare piece map so the board can probe
//! hypothetical placements (is the king safe after this move?) without
//! touching its own state.

use std::collections::HashMap;

use crate::{
    piece::{Color, PieceType},
    Move, MoveType, Piece, Position,
};

pub(crate) type PieceMap = HashMap<Position, Piece>;

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2), (2, 1), (2, -1), (1, -2),
    (-1, -2), (-2, -1), (-2, 1), (-1, 2),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1), (1, 1), (1, 0), (1, -1),
    (0, -1), (-1, -1), (-1, 0), (-1, 1),
];

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// Appends every pseudo-legal move of `piece` standing on `from`.
/// Castling is left to the board since it depends on castling rights.
pub(crate) fn pseudo_moves(
    pieces: &PieceMap,
    from: Position,
    piece: Piece,
    en_passant: Option<Position>,
    out: &mut Vec<Move>,
) {
    match piece.piece_type {
        PieceType::Pawn => pawn_moves(pieces, from, piece.color, en_passant, out),
        PieceType::Knight => step_moves(pieces, from, piece.color, &KNIGHT_OFFSETS, out),
        PieceType::Bishop => slide_moves(pieces, from, piece.color, &BISHOP_DIRECTIONS, out),
        PieceType::Rook => slide_moves(pieces, from, piece.color, &ROOK_DIRECTIONS, out),
        PieceType::Queen => {
            slide_moves(pieces, from, piece.color, &ROOK_DIRECTIONS, out);
            slide_moves(pieces, from, piece.color, &BISHOP_DIRECTIONS, out);
        }
        PieceType::King => step_moves(pieces, from, piece.color, &KING_OFFSETS, out),
    }
}

fn pawn_moves(
    pieces: &PieceMap,
    from: Position,
    color: Color,
    en_passant: Option<Position>,
    out: &mut Vec<Move>,
) {
    let direction = color.pawn_direction();
    let start_rank = match color {
        Color::White => 2,
        Color::Black => 7,
    };
    let promotion_rank = color.opposite().back_rank();

    let push_to = |to: Position, move_type: MoveType, out: &mut Vec<Move>| {
        if to.rank == promotion_rank {
            for promotion in PieceType::PROMOTIONS {
                out.push(Move::with_promotion(from, to, promotion).with_type(move_type));
            }
        } else {
            out.push(Move::new(from, to).with_type(move_type));
        }
    };

    if let Some(one) = from.offset(0, direction) {
        if !pieces.contains_key(&one) {
            push_to(one, MoveType::Normal, out);

            if from.rank == start_rank {
                if let Some(two) = from.offset(0, 2 * direction) {
                    if !pieces.contains_key(&two) {
                        out.push(Move::new(from, two));
                    }
                }
            }
        }
    }

    for df in [-1, 1] {
        let Some(target) = from.offset(df, direction) else {
            continue;
        };
        match pieces.get(&target) {
            Some(victim) if victim.color != color => push_to(target, MoveType::Capture, out),
            None if en_passant == Some(target) => out.push(Move::en_passant(from, target)),
            _ => {}
        }
    }
}

fn step_moves(
    pieces: &PieceMap,
    from: Position,
    color: Color,
    offsets: &[(i8, i8)],
    out: &mut Vec<Move>,
) {
    for &(df, dr) in offsets {
        let Some(to) = from.offset(df, dr) else {
            continue;
        };
        match pieces.get(&to) {
            None => out.push(Move::new(from, to)),
            Some(other) if other.color != color => out.push(Move::capture(from, to)),
            Some(_) => {}
        }
    }
}

fn slide_moves(
    pieces: &PieceMap,
    from: Position,
    color: Color,
    directions: &[(i8, i8)],
    out: &mut Vec<Move>,
) {
    for &(df, dr) in directions {
        let mut current = from;
        while let Some(to) = current.offset(df, dr) {
            match pieces.get(&to) {
                None => out.push(Move::new(from, to)),
                Some(other) => {
                    if other.color != color {
                        out.push(Move::capture(from, to));
                    }
                    break;
                }
            }
            current = to;
        }
    }
}

/// Whether any piece of color `by` attacks `target`.
pub(crate) fn is_square_attacked(pieces: &PieceMap, target: Position, by: Color) -> bool {
    let holds = |pos: Option<Position>, kinds: &[PieceType]| {
        pos.and_then(|p| pieces.get(&p))
            .map_or(false, |piece| piece.color == by && kinds.contains(&piece.piece_type))
    };

    // A pawn of `by` attacks diagonally forward, so look one rank behind the target.
    let behind = -by.pawn_direction();
    if holds(target.offset(-1, behind), &[PieceType::Pawn])
        || holds(target.offset(1, behind), &[PieceType::Pawn])
    {
        return true;
    }

    if KNIGHT_OFFSETS
        .iter()
        .any(|&(df, dr)| holds(target.offset(df, dr), &[PieceType::Knight]))
    {
        return true;
    }

    if KING_OFFSETS
        .iter()
        .any(|&(df, dr)| holds(target.offset(df, dr), &[PieceType::King]))
    {
        return true;
    }

    let ray_hits = |directions: &[(i8, i8)], kinds: &[PieceType]| {
        directions.iter().any(|&(df, dr)| {
            let mut current = target;
            while let Some(next) = current.offset(df, dr) {
                if let Some(piece) = pieces.get(&next) {
                    return piece.color == by && kinds.contains(&piece.piece_type);
                }
                current = next;
            }
            false
        })
    };

    ray_hits(&ROOK_DIRECTIONS, &[PieceType::Rook, PieceType::Queen])
        || ray_hits(&BISHOP_DIRECTIONS, &[PieceType::Bishop, PieceType::Queen])
}

pub(crate) fn find_king(pieces: &PieceMap, color: Color) -> Option<Position> {
    pieces
        .iter()
        .find(|(_, piece)| piece.piece_type == PieceType::King && piece.color == color)
        .map(|(pos, _)| *pos)
}

/// Rook from/to squares for a castling move of the king.
pub(crate) fn castle_rook_squares(chess_move: &Move) -> (Position, Position) {
    let rank = chess_move.from.rank;
    if chess_move.to.file == 7 {
        (Position { file: 8, rank }, Position { file: 6, rank })
    } else {
        (Position { file: 1, rank }, Position { file: 4, rank })
    }
}

/// The square whose occupant a move removes, if any.
pub(crate) fn capture_square(chess_move: &Move) -> Position {
    match chess_move.move_type {
        MoveType::EnPassant => Position {
            file: chess_move.to.file,
            rank: chess_move.from.rank,
        },
        _ => chess_move.to,
    }
}

/// Moves pieces on the map as `chess_move` dictates and returns whatever was
/// captured. No legality checks.
pub(crate) fn displace(pieces: &mut PieceMap, chess_move: &Move) -> Option<Piece> {
    let piece = pieces.remove(&chess_move.from)?;
    let captured = pieces.remove(&capture_square(chess_move));

    if chess_move.move_type == MoveType::Castle {
        let (rook_from, rook_to) = castle_rook_squares(chess_move);
        if let Some(rook) = pieces.remove(&rook_from) {
            pieces.insert(rook_to, rook);
        }
    }

    let placed = match chess_move.promotion {
        Some(promotion) => Piece::new(promotion, piece.color),
        None => piece,
    };
    pieces.insert(chess_move.to, placed);

    captured
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Position {
        Position::from_algebraic(s).unwrap()
    }

    fn map(entries: &[(&str, PieceType, Color)]) -> PieceMap {
        entries
            .iter()
            .map(|(s, kind, color)| (sq(s), Piece::new(*kind, *color)))
            .collect()
    }

    #[test]
    fn rook_rays_stop_at_blockers() {
        let pieces = map(&[
            ("a1", PieceType::Rook, Color::White),
            ("a4", PieceType::Pawn, Color::Black),
            ("c1", PieceType::Knight, Color::White),
        ]);
        let mut moves = Vec::new();
        pseudo_moves(&pieces, sq("a1"), pieces[&sq("a1")], None, &mut moves);

        let targets: Vec<_> = moves.iter().map(|m| m.to.to_string()).collect();
        assert_eq!(targets, vec!["a2", "a3", "a4", "b1"]);
        assert_eq!(moves[2].move_type, MoveType::Capture);
    }

    #[test]
    fn pawn_attacks_are_directional() {
        let pieces = map(&[("e4", PieceType::Pawn, Color::White)]);
        assert!(is_square_attacked(&pieces, sq("d5"), Color::White));
        assert!(is_square_attacked(&pieces, sq("f5"), Color::White));
        assert!(!is_square_attacked(&pieces, sq("e5"), Color::White));
        assert!(!is_square_attacked(&pieces, sq("d3"), Color::White));
    }

    #[test]
    fn sliders_are_blocked() {
        let pieces = map(&[
            ("a1", PieceType::Bishop, Color::Black),
            ("c3", PieceType::Pawn, Color::White),
        ]);
        assert!(is_square_attacked(&pieces, sq("b2"), Color::Black));
        assert!(is_square_attacked(&pieces, sq("c3"), Color::Black));
        assert!(!is_square_attacked(&pieces, sq("d4"), Color::Black));
    }

    #[test]
    fn promotions_expand_to_four_moves() {
        let pieces = map(&[("b7", PieceType::Pawn, Color::White), ("a8", PieceType::Rook, Color::Black)]);
        let mut moves = Vec::new();
        pseudo_moves(&pieces, sq("b7"), pieces[&sq("b7")], None, &mut moves);
        assert_eq!(moves.len(), 8);
        assert_eq!(moves.iter().filter(|m| m.is_capture()).count(), 4);
    }

    #[test]
    fn displace_handles_en_passant_and_castling() {
        let mut pieces = map(&[
            ("e5", PieceType::Pawn, Color::White),
            ("d5", PieceType::Pawn, Color::Black),
        ]);
        let captured = displace(&mut pieces, &Move::en_passant(sq("e5"), sq("d6")));
        assert_eq!(captured, Some(Piece::new(PieceType::Pawn, Color::Black)));
        assert!(!pieces.contains_key(&sq("d5")));

        let mut pieces = map(&[
            ("e1", PieceType::King, Color::White),
            ("h1", PieceType::Rook, Color::White),
        ]);
        displace(&mut pieces, &Move::castle(sq("e1"), sq("g1")));
        assert_eq!(pieces.get(&sq("f1")), Some(&Piece::new(PieceType::Rook, Color::White)));
        assert_eq!(pieces.get(&sq("g1")), Some(&Piece::new(PieceType::King, Color::White)));
    }
}
