use crate::chess::{Color, File, Rank, Role, Square};
use crate::util::Enum;
use derive_more::{Display, Error};
use std::str::FromStr;

/// A piece standing on a [`Square`] before the game starts.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Placement {
    pub color: Color,
    pub role: Role,
    pub square: Square,
    /// Whether the piece is considered to have moved already.
    pub moved: bool,
}

/// A starting arrangement.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Setup {
    pub placements: Vec<Placement>,
    pub turn: Color,
}

const BACK_RANK: [Role; 8] = [
    Role::Rook,
    Role::Knight,
    Role::Bishop,
    Role::Queen,
    Role::King,
    Role::Bishop,
    Role::Knight,
    Role::Rook,
];

/// The standard arrangement.
impl Default for Setup {
    fn default() -> Self {
        let mut placements = Vec::with_capacity(32);
        for color in Color::iter() {
            for (file, role) in File::iter().zip(BACK_RANK) {
                for (rank, role) in [(color.home_rank(), role), (color.pawn_rank(), Role::Pawn)] {
                    placements.push(Placement {
                        color,
                        role,
                        square: Square::new(file, rank),
                        moved: false,
                    });
                }
            }
        }

        Setup {
            placements,
            turn: Color::White,
        }
    }
}

/// The reason why parsing the FEN string failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
pub enum ParseSetupError {
    #[display("failed to parse piece placement")]
    InvalidPlacement,
    #[display("failed to parse side to move")]
    InvalidSideToMove,
    #[display("failed to parse castling rights")]
    InvalidCastlingRights,
    #[display("unspecified syntax error")]
    InvalidSyntax,
}

/// Parses the placement, side to move and castling rights of a [FEN] string.
///
/// Remaining fields are ignored. Pawns off their starting rank are considered moved, while
/// kings and rooks are considered unmoved only if castling rights are left for them.
///
/// [FEN]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
impl FromStr for Setup {
    type Err = ParseSetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<_> = s.split_whitespace().collect();
        let (board, turn, castles) = match &fields[..] {
            [board, turn] => (*board, *turn, "-"),
            [board, turn, castles, ..] => (*board, *turn, *castles),
            _ => return Err(ParseSetupError::InvalidSyntax),
        };

        let turn = match turn {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(ParseSetupError::InvalidSideToMove),
        };

        let mut rights = Vec::new();
        if castles != "-" {
            for c in castles.chars() {
                let right = match c {
                    'K' => (Color::White, File::H),
                    'Q' => (Color::White, File::A),
                    'k' => (Color::Black, File::H),
                    'q' => (Color::Black, File::A),
                    _ => return Err(ParseSetupError::InvalidCastlingRights),
                };

                if rights.contains(&right) {
                    return Err(ParseSetupError::InvalidCastlingRights);
                }

                rights.push(right);
            }
        }

        let ranks: Vec<_> = board.split('/').rev().collect();
        if ranks.len() != 8 {
            return Err(ParseSetupError::InvalidPlacement);
        }

        let mut placements = Vec::new();
        for (rank, segment) in Rank::iter().zip(ranks.iter()) {
            let mut file = 0;
            for c in segment.chars() {
                let mut buffer = [0; 4];

                if file >= 8 {
                    return Err(ParseSetupError::InvalidPlacement);
                } else if let Some(skip @ 1..=8) = c.to_digit(10) {
                    file += skip as usize;
                } else if let Ok(role) = c.to_ascii_uppercase().encode_utf8(&mut buffer).parse::<Role>() {
                    let color = match c.is_ascii_uppercase() {
                        true => Color::White,
                        false => Color::Black,
                    };

                    let square = Square::new(File::VARIANTS[file], rank);
                    let moved = match role {
                        Role::Pawn => rank != color.pawn_rank(),
                        Role::King => {
                            rank != color.home_rank()
                                || square.file() != Some(File::E)
                                || !rights.iter().any(|&(c, _)| c == color)
                        }
                        Role::Rook => {
                            rank != color.home_rank()
                                || !rights.iter().any(|&(c, f)| c == color && square.file() == Some(f))
                        }
                        Role::Knight | Role::Bishop | Role::Queen => false,
                    };

                    placements.push(Placement {
                        color,
                        role,
                        square,
                        moved,
                    });

                    file += 1;
                } else {
                    return Err(ParseSetupError::InvalidPlacement);
                }
            }

            if file != 8 {
                return Err(ParseSetupError::InvalidPlacement);
            }
        }

        Ok(Setup { placements, turn })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    fn sorted(mut setup: Setup) -> Setup {
        setup.placements.sort_by_key(|p| p.square);
        setup
    }

    #[test]
    fn default_setup_is_the_standard_arrangement() {
        assert_eq!(sorted(Setup::default()), sorted(START.parse().unwrap()));
    }

    #[test]
    fn default_setup_has_sixteen_pieces_per_side() {
        let setup = Setup::default();
        for c in Color::iter() {
            assert_eq!(setup.placements.iter().filter(|p| p.color == c).count(), 16);
        }

        assert!(setup.placements.iter().all(|p| !p.moved));
    }

    #[test]
    fn pawns_off_their_starting_rank_have_moved() {
        let setup: Setup = "4k3/8/8/4p3/4P3/8/3P4/4K3 b - - 0 1".parse().unwrap();
        let moved: Vec<_> = setup
            .placements
            .iter()
            .filter(|p| p.role == Role::Pawn)
            .map(|p| (p.square.to_string(), p.moved))
            .collect();

        assert_eq!(moved.len(), 3);
        assert!(moved.contains(&("d2".to_string(), false)));
        assert!(moved.contains(&("e4".to_string(), true)));
        assert!(moved.contains(&("e5".to_string(), true)));
        assert_eq!(setup.turn, Color::Black);
    }

    #[test]
    fn castling_rights_decide_whether_kings_and_rooks_have_moved() {
        let setup: Setup = "r3k2r/8/8/8/8/8/8/R3K2R w Kq - 0 1".parse().unwrap();
        let moved = |sq: &str| {
            let sq: Square = sq.parse().unwrap();
            setup.placements.iter().find(|p| p.square == sq).unwrap().moved
        };

        assert!(!moved("e1"));
        assert!(!moved("h1"));
        assert!(moved("a1"));
        assert!(!moved("e8"));
        assert!(!moved("a8"));
        assert!(moved("h8"));
    }

    #[test]
    fn trailing_fields_are_optional() {
        assert_eq!(
            "4k3/8/8/8/8/8/8/4K3 w".parse::<Setup>().map(|s| s.placements.len()),
            Ok(2)
        );
    }

    #[test]
    fn parsing_setup_fails_for_invalid_fields() {
        use ParseSetupError::*;
        assert_eq!("".parse::<Setup>(), Err(InvalidSyntax));
        assert_eq!("4k3/8/8/8/8/8/8/4K3 x".parse::<Setup>(), Err(InvalidSideToMove));
        assert_eq!("4k3/8/8/8/8/8/8/4K3 w KK".parse::<Setup>(), Err(InvalidCastlingRights));
        assert_eq!("4k3/8/8/8/8/8/8/4K3 w X".parse::<Setup>(), Err(InvalidCastlingRights));
        assert_eq!("4k3/8/8/8/8/8/4K3 w -".parse::<Setup>(), Err(InvalidPlacement));
        assert_eq!("4k3/8/8/8/8/8/8/4K4 w -".parse::<Setup>(), Err(InvalidPlacement));
        assert_eq!("4k3/8/8/8/8/8/8/4K2 w -".parse::<Setup>(), Err(InvalidPlacement));
        assert_eq!("4x3/8/8/8/8/8/8/4K3 w -".parse::<Setup>(), Err(InvalidPlacement));
    }

    #[proptest]
    fn parsing_setup_never_panics(s: String) {
        let _ = s.parse::<Setup>();
    }
}
