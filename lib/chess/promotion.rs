use crate::chess::Role;
use crate::util::Enum;
use derive_more::{Display, Error};
use std::str::FromStr;

/// The [`Role`] a pawn may be promoted to.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum Promotion {
    #[display("N")]
    Knight,
    #[display("B")]
    Bishop,
    #[display("R")]
    Rook,
    #[display("Q")]
    Queen,
}

impl Enum for Promotion {
    const VARIANTS: &'static [Self] = &[
        Promotion::Knight,
        Promotion::Bishop,
        Promotion::Rook,
        Promotion::Queen,
    ];

    #[inline(always)]
    fn index(&self) -> usize {
        *self as _
    }
}

impl From<Promotion> for Role {
    #[inline(always)]
    fn from(p: Promotion) -> Self {
        match p {
            Promotion::Knight => Role::Knight,
            Promotion::Bishop => Role::Bishop,
            Promotion::Rook => Role::Rook,
            Promotion::Queen => Role::Queen,
        }
    }
}

/// The reason why a [`Role`] is not a valid [`Promotion`].
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display("pawns may only be promoted to knights, bishops, rooks or queens")]
pub struct InvalidPromotion;

impl TryFrom<Role> for Promotion {
    type Error = InvalidPromotion;

    #[inline(always)]
    fn try_from(r: Role) -> Result<Self, Self::Error> {
        match r {
            Role::Knight => Ok(Promotion::Knight),
            Role::Bishop => Ok(Promotion::Bishop),
            Role::Rook => Ok(Promotion::Rook),
            Role::Queen => Ok(Promotion::Queen),
            Role::Pawn | Role::King => Err(InvalidPromotion),
        }
    }
}

impl FromStr for Promotion {
    type Err = InvalidPromotion;

    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Role>().map_err(|_| InvalidPromotion)?.try_into()
    }
}
