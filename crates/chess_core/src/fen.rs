//! Forsyth-Edwards Notation import and export.

use crate::{
    board::CastlingRights,
    error::FenError,
    movegen::PieceMap,
    piece::Color,
    Board, Piece, Position,
};

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Board {
    /// Parses a FEN string. The two move counters may be omitted.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 4 && fields.len() != 6 {
            return Err(FenError::FieldCount(fields.len()));
        }

        let pieces = parse_placement(fields[0])?;
        let current_turn = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::SideToMove(other.to_string())),
        };
        let castling_rights = parse_castling(fields[2])?;
        let en_passant = parse_en_passant(fields[3])?;

        let (halfmove_clock, fullmove_number) = if fields.len() == 6 {
            let counter = |s: &str| s.parse::<u32>().map_err(|_| FenError::Counter(s.to_string()));
            (counter(fields[4])?, counter(fields[5])?.max(1))
        } else {
            (0, 1)
        };

        Ok(Board::from_parts(
            pieces,
            current_turn,
            castling_rights,
            en_passant,
            halfmove_clock,
            fullmove_number,
        ))
    }

    pub fn to_fen(&self) -> String {
        let mut placement = String::new();
        for rank in (1..=8).rev() {
            let mut empty = 0;
            for file in 1..=8 {
                match self.get_piece(Position { file, rank }) {
                    Some(piece) => {
                        if empty > 0 {
                            placement.push_str(&empty.to_string());
                            empty = 0;
                        }
                        placement.push(piece.to_fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                placement.push_str(&empty.to_string());
            }
            if rank > 1 {
                placement.push('/');
            }
        }

        let side = match self.current_turn() {
            Color::White => "w",
            Color::Black => "b",
        };

        let rights = self.castling_rights();
        let mut castling = String::new();
        for (allowed, c) in [
            (rights.white_kingside, 'K'),
            (rights.white_queenside, 'Q'),
            (rights.black_kingside, 'k'),
            (rights.black_queenside, 'q'),
        ] {
            if allowed {
                castling.push(c);
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let en_passant = self
            .en_passant()
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{placement} {side} {castling} {en_passant} {} {}",
            self.halfmove_clock(),
            self.fullmove_number()
        )
    }
}

fn parse_placement(field: &str) -> Result<PieceMap, FenError> {
    let err = || FenError::Placement(field.to_string());
    let rows: Vec<&str> = field.split('/').collect();
    if rows.len() != 8 {
        return Err(err());
    }

    let mut pieces = PieceMap::new();
    for (row, rank) in rows.iter().zip((1..=8u8).rev()) {
        let mut file = 1u8;
        for c in row.chars() {
            if let Some(skip) = c.to_digit(10) {
                if !(1..=8).contains(&skip) {
                    return Err(err());
                }
                file += skip as u8;
            } else {
                let piece = Piece::from_fen_char(c).ok_or_else(err)?;
                let pos = Position::new(file, rank).ok_or_else(err)?;
                pieces.insert(pos, piece);
                file += 1;
            }
            if file > 9 {
                return Err(err());
            }
        }
        if file != 9 {
            return Err(err());
        }
    }
    Ok(pieces)
}

fn parse_castling(field: &str) -> Result<CastlingRights, FenError> {
    let mut rights = CastlingRights::none();
    if field == "-" {
        return Ok(rights);
    }
    for c in field.chars() {
        let slot = match c {
            'K' => &mut rights.white_kingside,
            'Q' => &mut rights.white_queenside,
            'k' => &mut rights.black_kingside,
            'q' => &mut rights.black_queenside,
            _ => return Err(FenError::Castling(field.to_string())),
        };
        if *slot {
            return Err(FenError::Castling(field.to_string()));
        }
        *slot = true;
    }
    Ok(rights)
}

fn parse_en_passant(field: &str) -> Result<Option<Position>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    match Position::from_algebraic(field) {
        Some(sq) if sq.rank == 3 || sq.rank == 6 => Ok(Some(sq)),
        _ => Err(FenError::EnPassant(field.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_round_trips() {
        let board = Board::from_fen(STARTING_FEN).unwrap();
        assert_eq!(board, Board::new());
        assert_eq!(Board::new().to_fen(), STARTING_FEN);
    }

    #[test]
    fn midgame_round_trips() {
        let fen = "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4";
        assert_eq!(Board::from_fen(fen).unwrap().to_fen(), fen);

        let fen = "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3";
        assert_eq!(Board::from_fen(fen).unwrap().to_fen(), fen);
    }

    #[test]
    fn fen_tracks_moves_played() {
        let mut board = Board::new();
        board.make_move("e2e4".parse().unwrap()).unwrap();
        assert_eq!(
            board.to_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }

    #[test]
    fn counters_are_optional() {
        let board = Board::from_fen("8/8/8/4k3/8/4K3/8/8 w - -").unwrap();
        assert_eq!(board.halfmove_clock(), 0);
        assert_eq!(board.fullmove_number(), 1);
    }

    #[test]
    fn rejects_malformed_fen() {
        assert_eq!(Board::from_fen("8/8/8 w"), Err(FenError::FieldCount(2)));
        assert!(FenError::FieldCount(2).to_string().contains("4 or 6"));
        assert!(matches!(
            Board::from_fen("8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::Placement(_))
        ));
        assert!(matches!(
            Board::from_fen("9/8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::Placement(_))
        ));
        assert!(matches!(
            Board::from_fen("8/8/8/8/8/8/8/8 x - - 0 1"),
            Err(FenError::SideToMove(_))
        ));
        assert!(matches!(
            Board::from_fen("8/8/8/8/8/8/8/8 w KK - 0 1"),
            Err(FenError::Castling(_))
        ));
        assert!(matches!(
            Board::from_fen("8/8/8/8/8/8/8/8 w - e4 0 1"),
            Err(FenError::EnPassant(_))
        ));
        assert!(matches!(
            Board::from_fen("8/8/8/8/8/8/8/8 w - - x 1"),
            Err(FenError::Counter(_))
        ));
    }
}
