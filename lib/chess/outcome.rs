use crate::chess::Color;
use derive_more::Display;

/// How a game of chess ended.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum Outcome {
    /// The side to move is in check and has no legal moves, the other side wins.
    #[display("checkmate, {_0} wins")]
    Checkmate(Color),

    /// The side to move is not in check but has no legal moves.
    #[display("stalemate")]
    Stalemate,
}

impl Outcome {
    /// Whether the outcome is a [draw] and neither side has won.
    ///
    /// [draw]: https://www.chessprogramming.org/Draw
    #[inline(always)]
    pub fn is_draw(&self) -> bool {
        self.winner().is_none()
    }

    /// The winning side, if any.
    #[inline(always)]
    pub fn winner(&self) -> Option<Color> {
        match *self {
            Outcome::Checkmate(c) => Some(c),
            Outcome::Stalemate => None,
        }
    }
}
