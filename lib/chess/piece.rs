use crate::chess::{Color, Role};
use derive_more::{Display, From};
use std::fmt;
use std::ops::Index;

/// The stable identity of a [`Piece`] in a [`PieceSet`].
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, From)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[display("#{_0}")]
pub struct PieceId(u16);

impl PieceId {
    /// This id's position in the arena.
    #[inline(always)]
    pub fn index(&self) -> usize {
        self.0 as _
    }
}

/// A chess piece of a certain [`Color`] and [`Role`].
///
/// Where the piece stands and whether it has moved is a matter of the
/// [`Board`][`crate::chess::Board`], not of the piece itself.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Piece {
    id: PieceId,
    color: Color,
    role: Role,
}

impl Piece {
    /// Constructs a [`Piece`] with the given identity.
    #[inline(always)]
    pub fn new(id: PieceId, color: Color, role: Role) -> Self {
        Piece { id, color, role }
    }

    /// This piece's identity.
    #[inline(always)]
    pub fn id(&self) -> PieceId {
        self.id
    }

    /// This piece's [`Color`].
    #[inline(always)]
    pub fn color(&self) -> Color {
        self.color
    }

    /// This piece's [`Role`].
    #[inline(always)]
    pub fn role(&self) -> Role {
        self.role
    }
}

/// Prints the piece letter, upper case for white and lower case for black.
impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = self.role.to_string();
        match self.color {
            Color::White => f.write_str(&letter),
            Color::Black => f.write_str(&letter.to_ascii_lowercase()),
        }
    }
}

/// An append-only arena of [`Piece`]s addressed by [`PieceId`].
///
/// Ids are handed out in sequence and never recycled, so a record that refers to a
/// captured piece can always restore it.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct PieceSet(Vec<Piece>);

impl PieceSet {
    /// Constructs an empty arena.
    #[inline(always)]
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of pieces ever allocated.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no pieces were ever allocated.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The id the next allocated piece will receive.
    #[inline(always)]
    pub fn next_id(&self) -> PieceId {
        PieceId(self.0.len() as _)
    }

    /// Allocates a new piece.
    pub fn insert(&mut self, color: Color, role: Role) -> Piece {
        let piece = Piece::new(self.next_id(), color, role);
        self.0.push(piece);
        piece
    }

    /// Stores a piece under its own id, which must be either allocated or the next one.
    pub fn store(&mut self, piece: Piece) {
        match piece.id.index() {
            i if i < self.0.len() => self.0[i] = piece,
            i => {
                debug_assert_eq!(i, self.0.len(), "piece ids must be allocated in sequence");
                self.0.push(piece)
            }
        }
    }

    /// The piece with the given id, if allocated.
    #[inline(always)]
    pub fn get(&self, id: PieceId) -> Option<&Piece> {
        self.0.get(id.index())
    }

    /// An iterator over all pieces ever allocated.
    #[inline(always)]
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Piece> + ExactSizeIterator {
        self.0.iter()
    }
}

impl Index<PieceId> for PieceSet {
    type Output = Piece;

    #[inline(always)]
    fn index(&self, id: PieceId) -> &Self::Output {
        &self.0[id.index()]
    }
}
