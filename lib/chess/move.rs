use crate::chess::{Board, Color, Piece, PieceId, Role, Square};
use derive_more::{Display, Error};
use std::fmt;

/// The part of a [`MoveRecord`] that depends on the kind of move.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MoveKind {
    /// A regular move, possibly capturing the piece on the destination square.
    Normal { capture: Option<PieceId> },

    /// A pawn capturing a pawn that has just passed it.
    EnPassant {
        /// The pawn captured.
        capture: PieceId,
        /// Where the captured pawn stands, which is not the destination square.
        square: Square,
        /// Whether the captured pawn had moved before.
        moved: bool,
    },

    /// The king and a rook moving together.
    Castle {
        rook: PieceId,
        whence: Square,
        whither: Square,
        /// Whether the rook had moved before, which is never the case for legal castling.
        moved: bool,
    },

    /// A pawn reaching the farthest rank, possibly capturing.
    ///
    /// The new piece is unset until the owner chooses it.
    Promotion {
        capture: Option<PieceId>,
        piece: Option<Piece>,
    },
}

/// The reason why completing a promotion failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display("only promotions can be completed")]
pub struct NotAPromotion;

/// A self-sufficient description of a state transition on the [`Board`].
///
/// Every record snapshots all it needs to be applied and undone exactly,
/// no field is computed when the record is played.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct MoveRecord {
    color: Color,
    piece: PieceId,
    moved: bool,
    whence: Square,
    whither: Square,
    kind: MoveKind,
}

impl MoveRecord {
    fn new(board: &Board, piece: PieceId, whither: Square, kind: MoveKind) -> Self {
        MoveRecord {
            color: board.piece(piece).color(),
            piece,
            moved: board.has_moved(piece),
            whence: board.position_of(piece).expect("expected piece on the board"),
            whither,
            kind,
        }
    }

    /// A regular move, capturing whatever stands on the destination square.
    pub fn normal(board: &Board, piece: PieceId, whither: Square) -> Self {
        let capture = board.piece_at(whither).map(|p| p.id());
        Self::new(board, piece, whither, MoveKind::Normal { capture })
    }

    /// A pawn capturing `capture` en passant.
    pub fn en_passant(board: &Board, pawn: PieceId, whither: Square, capture: PieceId) -> Self {
        let kind = MoveKind::EnPassant {
            capture,
            square: board.position_of(capture).expect("expected pawn on the board"),
            moved: board.has_moved(capture),
        };

        Self::new(board, pawn, whither, kind)
    }

    /// The king moving to `whither` while the rook moves to `rook_whither`.
    pub fn castle(
        board: &Board,
        king: PieceId,
        whither: Square,
        rook: PieceId,
        rook_whither: Square,
    ) -> Self {
        let kind = MoveKind::Castle {
            rook,
            whence: board.position_of(rook).expect("expected rook on the board"),
            whither: rook_whither,
            moved: board.has_moved(rook),
        };

        Self::new(board, king, whither, kind)
    }

    /// A pending promotion, whose new piece is yet to be chosen.
    pub fn pending_promotion(board: &Board, pawn: PieceId, whither: Square) -> Self {
        let capture = board.piece_at(whither).map(|p| p.id());
        Self::new(board, pawn, whither, MoveKind::Promotion { capture, piece: None })
    }

    /// The side that plays this move.
    #[inline(always)]
    pub fn color(&self) -> Color {
        self.color
    }

    /// The piece moved.
    #[inline(always)]
    pub fn piece(&self) -> PieceId {
        self.piece
    }

    /// Whether the piece moved had moved before.
    #[inline(always)]
    pub fn moved(&self) -> bool {
        self.moved
    }

    /// The source [`Square`].
    #[inline(always)]
    pub fn whence(&self) -> Square {
        self.whence
    }

    /// The destination [`Square`].
    #[inline(always)]
    pub fn whither(&self) -> Square {
        self.whither
    }

    /// The kind-specific payload.
    #[inline(always)]
    pub fn kind(&self) -> &MoveKind {
        &self.kind
    }

    /// The piece captured, if any, including pawns captured en passant.
    #[inline(always)]
    pub fn capture(&self) -> Option<PieceId> {
        match self.kind {
            MoveKind::Normal { capture } | MoveKind::Promotion { capture, .. } => capture,
            MoveKind::EnPassant { capture, .. } => Some(capture),
            MoveKind::Castle { .. } => None,
        }
    }

    /// Whether this move captures a piece.
    #[inline(always)]
    pub fn is_capture(&self) -> bool {
        self.capture().is_some()
    }

    /// Whether this is an en passant capture.
    #[inline(always)]
    pub fn is_en_passant(&self) -> bool {
        matches!(self.kind, MoveKind::EnPassant { .. })
    }

    /// Whether this is a castling move.
    #[inline(always)]
    pub fn is_castling(&self) -> bool {
        matches!(self.kind, MoveKind::Castle { .. })
    }

    /// Whether this is a promotion, complete or not.
    #[inline(always)]
    pub fn is_promotion(&self) -> bool {
        matches!(self.kind, MoveKind::Promotion { .. })
    }

    /// Whether this record may be played, which is only not the case for pending promotions.
    #[inline(always)]
    pub fn is_complete(&self) -> bool {
        !matches!(self.kind, MoveKind::Promotion { piece: None, .. })
    }

    /// The [`Role`] of the promoted piece, if chosen.
    #[inline(always)]
    pub fn promotion(&self) -> Option<Role> {
        match self.kind {
            MoveKind::Promotion { piece, .. } => piece.map(|p| p.role()),
            _ => None,
        }
    }

    /// Completes a promotion with the piece that replaces the pawn.
    ///
    /// Completing a promotion that is already complete replaces the previous choice.
    pub fn complete(mut self, new: Piece) -> Result<Self, NotAPromotion> {
        match &mut self.kind {
            MoveKind::Promotion { piece, .. } => {
                debug_assert_eq!(new.color(), self.color);
                *piece = Some(new);
                Ok(self)
            }

            _ => Err(NotAPromotion),
        }
    }
}

/// Prints the move in [pure coordinate notation].
///
/// [pure coordinate notation]: https://www.chessprogramming.org/Algebraic_Chess_Notation#Pure_coordinate_notation
impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.whence, self.whither)?;
        if let Some(r) = self.promotion() {
            write!(f, "{}", r.to_string().to_ascii_lowercase())?;
        }

        Ok(())
    }
}
