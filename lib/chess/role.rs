use crate::util::Enum;
use derive_more::{Display, Error};
use std::fmt::{self, Formatter, Write};
use std::str::FromStr;

/// The type of a chess [`Piece`][`crate::chess::Piece`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[repr(u8)]
pub enum Role {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Enum for Role {
    const VARIANTS: &'static [Self] = &[
        Role::Pawn,
        Role::Knight,
        Role::Bishop,
        Role::Rook,
        Role::Queen,
        Role::King,
    ];

    #[inline(always)]
    fn index(&self) -> usize {
        *self as _
    }
}

/// Prints the upper case letter used in algebraic notation.
impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Role::Pawn => f.write_char('P'),
            Role::Knight => f.write_char('N'),
            Role::Bishop => f.write_char('B'),
            Role::Rook => f.write_char('R'),
            Role::Queen => f.write_char('Q'),
            Role::King => f.write_char('K'),
        }
    }
}

/// The reason why parsing [`Role`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display("failed to parse piece, expected one of `PNBRQK`")]
pub struct ParseRoleError;

impl FromStr for Role {
    type Err = ParseRoleError;

    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "P" => Ok(Role::Pawn),
            "N" => Ok(Role::Knight),
            "B" => Ok(Role::Bishop),
            "R" => Ok(Role::Rook),
            "Q" => Ok(Role::Queen),
            "K" => Ok(Role::King),
            _ => Err(ParseRoleError),
        }
    }
}
