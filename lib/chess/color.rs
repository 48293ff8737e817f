use crate::chess::Rank;
use crate::util::Enum;
use derive_more::Display;
use std::ops::Not;

/// The color of a chess [`Piece`][`crate::chess::Piece`], which identifies its owner.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[repr(u8)]
pub enum Color {
    #[display("white")]
    White,
    #[display("black")]
    Black,
}

impl Color {
    /// The other side.
    #[inline(always)]
    pub fn opponent(self) -> Self {
        !self
    }

    /// The [`Rank`] where this side's pieces start.
    #[inline(always)]
    pub fn home_rank(self) -> Rank {
        match self {
            Color::White => Rank::First,
            Color::Black => Rank::Eighth,
        }
    }

    /// The [`Rank`] where this side's pawns start.
    #[inline(always)]
    pub fn pawn_rank(self) -> Rank {
        match self {
            Color::White => Rank::Second,
            Color::Black => Rank::Seventh,
        }
    }

    /// The direction this side's pawns advance in, as a rank offset.
    #[inline(always)]
    pub fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

impl Enum for Color {
    const VARIANTS: &'static [Self] = &[Color::White, Color::Black];

    #[inline(always)]
    fn index(&self) -> usize {
        *self as _
    }
}

impl Not for Color {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    #[proptest]
    fn color_implements_not_operator(c: Color) {
        assert_eq!(!!c, c);
        assert_ne!(!c, c);
    }

    #[proptest]
    fn opponent_is_an_involution(c: Color) {
        assert_eq!(c.opponent().opponent(), c);
        assert_eq!(c.opponent(), !c);
    }

    #[proptest]
    fn pawns_start_one_rank_ahead_of_pieces(c: Color) {
        assert_eq!(c.pawn_rank() as i8 - c.home_rank() as i8, c.forward());
    }

    #[proptest]
    fn home_ranks_lie_on_opposite_edges(c: Color) {
        assert_eq!(c.home_rank().index() + (!c).home_rank().index(), 7);
    }
}
