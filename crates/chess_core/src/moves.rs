use std::fmt;
use std::str::FromStr;

use crate::{error::ParseMoveError, piece::PieceType, Piece, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub move_type: MoveType,
    pub promotion: Option<PieceType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveType {
    Normal,
    Capture,
    EnPassant,
    Castle,
}

impl Move {
    pub fn new(from: Position, to: Position) -> Self {
        Self {
            from,
            to,
            promotion: None,
            move_type: MoveType::Normal,
        }
    }

    pub fn capture(from: Position, to: Position) -> Self {
        Self {
            from,
            to,
            promotion: None,
            move_type: MoveType::Capture,
        }
    }

    pub fn with_promotion(from: Position, to: Position, promotion: PieceType) -> Self {
        Self {
            from,
            to,
            promotion: Some(promotion),
            move_type: MoveType::Normal,
        }
    }

    pub fn en_passant(from: Position, to: Position) -> Self {
        Self {
            from,
            to,
            promotion: None,
            move_type: MoveType::EnPassant,
        }
    }

    pub fn castle(from: Position, to: Position) -> Self {
        Self {
            from,
            to,
            promotion: None,
            move_type: MoveType::Castle,
        }
    }

    pub fn with_type(mut self, move_type: MoveType) -> Self {
        self.move_type = move_type;
        self
    }

    pub fn is_capture(&self) -> bool {
        matches!(self.move_type, MoveType::Capture | MoveType::EnPassant)
    }

    /// Whether `self` names the same from/to/promotion as `request`, ignoring
    /// the move type which only the board can work out.
    pub fn matches(&self, request: &Move) -> bool {
        self.from == request.from && self.to == request.to && self.promotion == request.promotion
    }
}

/// Coordinate notation, e.g. `e2e4` or `e7e8q`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.to_char())?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseMoveError(s.to_string());
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(err());
        }

        let from = Position::from_algebraic(&s[0..2]).ok_or_else(err)?;
        let to = Position::from_algebraic(&s[2..4]).ok_or_else(err)?;
        match s[4..].chars().next() {
            None => Ok(Move::new(from, to)),
            Some(c) => match PieceType::from_char(c) {
                Some(p @ (PieceType::Queen | PieceType::Rook | PieceType::Bishop | PieceType::Knight)) => {
                    Ok(Move::with_promotion(from, to, p))
                }
                _ => Err(err()),
            },
        }
    }
}

/// What happened when a move was played, for hosts that track captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveResult {
    pub mv: Move,
    pub piece: Piece,
    pub captured: Option<Piece>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Position {
        Position::from_algebraic(s).unwrap()
    }

    #[test]
    fn coordinate_notation_round_trips() {
        let mv: Move = "e2e4".parse().unwrap();
        assert_eq!(mv, Move::new(sq("e2"), sq("e4")));
        assert_eq!(mv.to_string(), "e2e4");

        let promo: Move = "e7e8n".parse().unwrap();
        assert_eq!(promo.promotion, Some(PieceType::Knight));
        assert_eq!(promo.to_string(), "e7e8n");
    }

    #[test]
    fn rejects_bad_notation() {
        assert!("e2".parse::<Move>().is_err());
        assert!("e2e9".parse::<Move>().is_err());
        assert!("e7e8k".parse::<Move>().is_err());
        assert!("e7e8qq".parse::<Move>().is_err());
    }

    #[test]
    fn matching_ignores_move_type() {
        let request = Move::new(sq("d4"), sq("e5"));
        assert!(Move::capture(sq("d4"), sq("e5")).matches(&request));
        assert!(!Move::with_promotion(sq("d7"), sq("d8"), PieceType::Queen)
            .matches(&Move::new(sq("d7"), sq("d8"))));
    }
}
