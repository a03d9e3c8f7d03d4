use std::fmt;
use std::str::FromStr;

use crate::error::ParseDifficultyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// How a difficulty tier plays: how deep it searches and how often it skips
/// the search for a random legal move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchPolicy {
    pub depth: u8,
    pub random_move_chance: f64,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn policy(self) -> SearchPolicy {
        match self {
            Difficulty::Easy => SearchPolicy { depth: 1, random_move_chance: 0.3 },
            Difficulty::Medium => SearchPolicy { depth: 2, random_move_chance: 0.0 },
            Difficulty::Hard => SearchPolicy { depth: 3, random_move_chance: 0.0 },
        }
    }

    /// Name shown on the difficulty picker.
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Casual",
            Difficulty::Medium => "Tactical",
            Difficulty::Hard => "Master",
        }
    }

    pub fn tagline(self) -> &'static str {
        match self {
            Difficulty::Easy => "For relaxation",
            Difficulty::Medium => "Standard challenge",
            Difficulty::Hard => "Deep calculation",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseDifficultyError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_map_to_depths() {
        let depths: Vec<u8> = Difficulty::ALL.iter().map(|d| d.policy().depth).collect();
        assert_eq!(depths, vec![1, 2, 3]);
        assert!(Difficulty::ALL.iter().all(|d| d.policy().depth >= 1));
    }

    #[test]
    fn only_easy_plays_random_moves() {
        assert_eq!(Difficulty::Easy.policy().random_move_chance, 0.3);
        assert_eq!(Difficulty::Medium.policy().random_move_chance, 0.0);
        assert_eq!(Difficulty::Hard.policy().random_move_chance, 0.0);
    }

    #[test]
    fn tiers_are_ordered() {
        assert!(Difficulty::Easy < Difficulty::Medium);
        assert!(Difficulty::Medium < Difficulty::Hard);
        assert_eq!(Difficulty::default(), Difficulty::Medium);
    }

    #[test]
    fn parses_names() {
        for difficulty in Difficulty::ALL {
            assert_eq!(difficulty.to_string().parse(), Ok(difficulty));
        }
        assert_eq!(" HARD ".parse(), Ok(Difficulty::Hard));
        assert!("impossible".parse::<Difficulty>().is_err());
    }
}
