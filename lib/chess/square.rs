use crate::chess::{File, ParseFileError, ParseRankError, Rank};
use crate::util::Enum;
use derive_more::{Display, Error, From};
use std::{fmt, str::FromStr};

/// A pair of board coordinates.
///
/// Coordinates outside of the board are representable, but [invalid](`Square::is_valid`),
/// which makes it convenient to step off the edge of the board while scanning.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub struct Square {
    #[cfg_attr(test, strategy(0i8..8))]
    rank: i8,
    #[cfg_attr(test, strategy(0i8..8))]
    file: i8,
}

impl Square {
    /// Constructs [`Square`] from a pair of [`File`] and [`Rank`].
    #[inline(always)]
    pub const fn new(f: File, r: Rank) -> Self {
        Square {
            file: f as i8,
            rank: r as i8,
        }
    }

    /// Constructs [`Square`] from raw coordinates, which may lie off the board.
    #[inline(always)]
    pub const fn from_coords(file: i8, rank: i8) -> Self {
        Square { file, rank }
    }

    /// An iterator over all valid squares, rank by rank.
    #[inline(always)]
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator {
        (0..64).map(|i| Square::from_coords(i % 8, i / 8))
    }

    /// Whether this square lies on the board.
    #[inline(always)]
    pub const fn is_valid(&self) -> bool {
        0 <= self.file && self.file < 8 && 0 <= self.rank && self.rank < 8
    }

    /// The raw file coordinate.
    #[inline(always)]
    pub const fn x(&self) -> i8 {
        self.file
    }

    /// The raw rank coordinate.
    #[inline(always)]
    pub const fn y(&self) -> i8 {
        self.rank
    }

    /// This square's [`File`], if on the board.
    #[inline(always)]
    pub fn file(&self) -> Option<File> {
        self.is_valid().then(|| File::from_index(self.file as _))?
    }

    /// This square's [`Rank`], if on the board.
    #[inline(always)]
    pub fn rank(&self) -> Option<Rank> {
        self.is_valid().then(|| Rank::from_index(self.rank as _))?
    }

    /// Dense index in `0..64`, if on the board.
    #[inline(always)]
    pub fn index(&self) -> Option<usize> {
        self.is_valid()
            .then(|| self.rank as usize * 8 + self.file as usize)
    }

    /// The square reached by stepping `df` files and `dr` ranks away.
    #[inline(always)]
    pub const fn offset(&self, df: i8, dr: i8) -> Self {
        Square::from_coords(self.file + df, self.rank + dr)
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({self})")
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.file(), self.rank()) {
            (Some(file), Some(rank)) => write!(f, "{file}{rank}"),
            _ => write!(f, "[{}, {}]", self.file, self.rank),
        }
    }
}

/// The reason why parsing [`Square`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error, From)]
pub enum ParseSquareError {
    #[display("failed to parse square")]
    InvalidFile(ParseFileError),
    #[display("failed to parse square")]
    InvalidRank(ParseRankError),
}

impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let i = s.char_indices().nth(1).map_or_else(|| s.len(), |(i, _)| i);
        Ok(Square::new(s[..i].parse()?, s[i..].parse()?))
    }
}
