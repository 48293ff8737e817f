use crate::chess::{Board, File, GameState, MoveRecord, Promotion, Rank, Role, Square};
use derive_more::{Display, Error, From};
use std::fmt::{self, Write};
use std::str::FromStr;
use tracing::{debug, instrument};

/// The side of the board a king castles towards.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum Wing {
    #[display("O-O")]
    Kingside,
    #[display("O-O-O")]
    Queenside,
}

impl Wing {
    /// The [`File`] the king lands on.
    #[inline(always)]
    pub fn file(&self) -> File {
        match self {
            Wing::Kingside => File::G,
            Wing::Queenside => File::C,
        }
    }
}

/// What a [`San`] token describes, besides check.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Action {
    Castle(Wing),
    Normal {
        role: Role,
        file: Option<File>,
        rank: Option<Rank>,
        capture: bool,
        whither: Square,
        promotion: Option<Promotion>,
        en_passant: bool,
    },
}

/// Whether a move gives check.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum Suffix {
    #[display("+")]
    Check,
    #[display("#")]
    Checkmate,
}

/// A move in [standard algebraic notation].
///
/// [standard algebraic notation]: https://www.chessprogramming.org/Algebraic_Chess_Notation#Standard_Algebraic_Notation_.28SAN.29
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct San {
    pub action: Action,
    pub suffix: Option<Suffix>,
}

/// The reason why parsing [`San`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display("failed to parse move in standard algebraic notation")]
pub struct ParseSanError;

/// The reason why decoding a [`San`] into a [`MoveRecord`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error, From)]
pub enum DecodeSanError {
    #[display("{_0}")]
    InvalidSyntax(ParseSanError),
    #[display("no legal move matches `{_0}`")]
    #[from(ignore)]
    NoMatchingLegalMove(#[error(not(source))] San),
    #[display("more than one legal move matches `{_0}`")]
    #[from(ignore)]
    AmbiguousMove(#[error(not(source))] San),
}

impl San {
    /// Encodes a legal move of the side to move.
    ///
    /// Disambiguates by file if it is unique among the other pieces of the same role that
    /// can reach the destination, otherwise by rank if that is unique, otherwise by both.
    pub fn encode(game: &GameState, m: &MoveRecord) -> Self {
        let suffix = Self::suffix(game, m);

        if let Some(wing) = Self::wing(m) {
            return San {
                action: Action::Castle(wing),
                suffix,
            };
        }

        let board = game.board();
        let role = board.piece(m.piece()).role();
        let (file, rank) = match role {
            Role::Pawn if m.is_capture() => (m.whence().file(), None),
            Role::Pawn | Role::King => (None, None),
            _ => {
                let rivals: Vec<_> = board
                    .pieces_of(m.color())
                    .filter(|p| p.role() == role && p.id() != m.piece())
                    .filter(|p| game.legal_moves(p.id()).iter().any(|o| o.whither() == m.whither()))
                    .filter_map(|p| board.position_of(p.id()))
                    .collect();

                let whence = m.whence();
                if rivals.is_empty() {
                    (None, None)
                } else if rivals.iter().all(|sq| sq.x() != whence.x()) {
                    (whence.file(), None)
                } else if rivals.iter().all(|sq| sq.y() != whence.y()) {
                    (None, whence.rank())
                } else {
                    (whence.file(), whence.rank())
                }
            }
        };

        San {
            action: Action::Normal {
                role,
                file,
                rank,
                capture: m.is_capture(),
                whither: m.whither(),
                promotion: m.promotion().and_then(|r| Promotion::try_from(r).ok()),
                en_passant: false,
            },
            suffix,
        }
    }

    fn wing(m: &MoveRecord) -> Option<Wing> {
        if !m.is_castling() {
            return None;
        }

        [Wing::Kingside, Wing::Queenside]
            .into_iter()
            .find(|w| m.whither().file() == Some(w.file()))
    }

    fn suffix(game: &GameState, m: &MoveRecord) -> Option<Suffix> {
        let mut next = game.clone();
        next.play_unchecked(*m);

        if !next.is_check() {
            None
        } else if next.is_checkmate() {
            Some(Suffix::Checkmate)
        } else {
            Some(Suffix::Check)
        }
    }

    fn matches(&self, board: &Board, m: &MoveRecord) -> bool {
        match self.action {
            Action::Castle(wing) => Self::wing(m) == Some(wing),
            Action::Normal {
                role,
                file,
                rank,
                capture,
                whither,
                promotion,
                en_passant,
            } => {
                !m.is_castling()
                    && board.piece(m.piece()).role() == role
                    && m.whither() == whither
                    && file.is_none_or(|f| m.whence().file() == Some(f))
                    && rank.is_none_or(|r| m.whence().rank() == Some(r))
                    && (!capture || m.is_capture())
                    && (!en_passant || m.is_en_passant())
                    && promotion.is_some() == m.is_promotion()
            }
        }
    }

    /// Finds the legal move of the side to move this token describes.
    ///
    /// Check suffixes are not verified.
    /// If the token names a promotion, the returned move is completed accordingly.
    pub fn resolve(&self, game: &GameState) -> Result<MoveRecord, DecodeSanError> {
        let board = game.board();
        let mut candidates = game.moves().into_iter().filter(|m| self.matches(board, m));

        let Some(m) = candidates.next() else {
            return Err(DecodeSanError::NoMatchingLegalMove(*self));
        };

        if candidates.next().is_some() {
            return Err(DecodeSanError::AmbiguousMove(*self));
        }

        match self.action {
            Action::Normal {
                promotion: Some(p), ..
            } => Ok(game.promote(m, p).expect("expected promotion")),
            _ => Ok(m),
        }
    }
}

/// Decodes a token in standard algebraic notation into a legal move of the side to move.
#[instrument(level = "debug", skip(game), err)]
pub fn decode(token: &str, game: &GameState) -> Result<MoveRecord, DecodeSanError> {
    let san: San = token.parse()?;
    let m = san.resolve(game)?;
    debug!(%san, %m, "decoded");
    Ok(m)
}

impl fmt::Display for San {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.action {
            Action::Castle(wing) => write!(f, "{wing}")?,
            Action::Normal {
                role,
                file,
                rank,
                capture,
                whither,
                promotion,
                en_passant,
            } => {
                if role != Role::Pawn {
                    write!(f, "{role}")?;
                }

                if let Some(file) = file {
                    write!(f, "{file}")?;
                }

                if let Some(rank) = rank {
                    write!(f, "{rank}")?;
                }

                if capture {
                    f.write_char('x')?;
                }

                write!(f, "{whither}")?;

                if let Some(p) = promotion {
                    write!(f, "={p}")?;
                }

                if en_passant {
                    f.write_str("(ep)")?;
                }
            }
        }

        if let Some(suffix) = self.suffix {
            write!(f, "{suffix}")?;
        }

        Ok(())
    }
}

impl FromStr for San {
    type Err = ParseSanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_ascii() {
            return Err(ParseSanError);
        }

        let (s, suffix) = match s.as_bytes().last() {
            Some(b'#') => (&s[..s.len() - 1], Some(Suffix::Checkmate)),
            Some(b'+') => (&s[..s.len() - 1], Some(Suffix::Check)),
            _ => (s, None),
        };

        let action = match s {
            "O-O" | "0-0" => Action::Castle(Wing::Kingside),
            "O-O-O" | "0-0-0" => Action::Castle(Wing::Queenside),
            _ => {
                let (s, en_passant) = match s.strip_suffix("(ep)").or(s.strip_suffix("e.p.")) {
                    Some(s) => (s, true),
                    None => (s, false),
                };

                let (s, promotion) = match s.split_once('=') {
                    None => (s, None),
                    Some((s, p)) => (s, Some(p.parse::<Promotion>().map_err(|_| ParseSanError)?)),
                };

                let Some(i) = s.len().checked_sub(2) else {
                    return Err(ParseSanError);
                };

                let whither: Square = s[i..].parse().map_err(|_| ParseSanError)?;
                let s = &s[..i];

                let (role, s) = match s.get(..1).map(str::parse::<Role>) {
                    Some(Ok(role)) if s.starts_with(|c: char| c.is_ascii_uppercase()) => (role, &s[1..]),
                    _ => (Role::Pawn, s),
                };

                let (s, capture) = match s.strip_suffix('x') {
                    Some(s) => (s, true),
                    None => (s, false),
                };

                let (file, rank): (Option<File>, Option<Rank>) = match s.len() {
                    0 => (None, None),
                    1 => match (s.parse().ok(), s.parse().ok()) {
                        (None, None) => return Err(ParseSanError),
                        disambiguation => disambiguation,
                    },
                    2 => {
                        let file = s[..1].parse().map_err(|_| ParseSanError)?;
                        let rank = s[1..].parse().map_err(|_| ParseSanError)?;
                        (Some(file), Some(rank))
                    }
                    _ => return Err(ParseSanError),
                };

                if promotion.is_some() && role != Role::Pawn {
                    return Err(ParseSanError);
                }

                Action::Normal {
                    role,
                    file,
                    rank,
                    capture,
                    whither,
                    promotion,
                    en_passant,
                }
            }
        };

        Ok(San { action, suffix })
    }
}
