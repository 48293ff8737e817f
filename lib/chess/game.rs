use crate::chess::{movement, Board, Color, History, MoveKind, MoveRecord, Moves, NotAPromotion};
use crate::chess::{Outcome, ParseSetupError, Piece, PieceId, Promotion, Role, San, Setup};
use crate::chess::{DecodeSanError, Square, Transcript};
use crate::util::Enum;
use derive_more::{Display, Error, From};
use std::str::FromStr;
use tracing::{debug, instrument};

#[cfg(test)]
use proptest::{prelude::*, sample::{Selector, SelectorStrategy}, strategy::Map};

#[cfg(test)]
use std::ops::Range;

/// The reason why a [`Setup`] cannot start a game.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
pub enum IllegalSetup {
    #[display("the {_0} side has no king")]
    MissingKing(#[error(not(source))] Color),
    #[display("the {_0} side has more than one king")]
    TooManyKings(#[error(not(source))] Color),
    #[display("square `{_0}` holds more than one piece")]
    OccupiedSquare(#[error(not(source))] Square),
    #[display("square `{_0}` is off the board")]
    InvalidSquare(#[error(not(source))] Square),
}

/// The reason why a [`MoveRecord`] was rejected.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
pub enum IllegalMove {
    #[display("it is not the {_0} side's turn")]
    WrongTurn(#[error(not(source))] Color),
    #[display("the piece to promote to has not been chosen")]
    IncompletePromotion,
    #[display("move `{_0}` is not available in this position")]
    Unavailable(#[error(not(source))] MoveRecord),
}

/// The reason why parsing [`GameState`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error, From)]
pub enum ParseGameError {
    #[display("{_0}")]
    InvalidSetup(ParseSetupError),
    #[display("{_0}")]
    IllegalSetup(IllegalSetup),
}

/// The reason why replaying a [`Transcript`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
pub enum ReplayError {
    #[display("the transcript starts with {first} to move, but it is {turn}'s turn")]
    WrongTurn { first: Color, turn: Color },
    #[display("failed to replay move #{} `{san}`", index + 1)]
    Unplayable {
        /// The position of the offending token in the transcript.
        index: usize,
        san: San,
        source: DecodeSanError,
    },
}

/// The state of a game of chess.
///
/// Owns the [`Board`], the [`History`] of moves applied to it and the side to move.
/// Every query takes `&self` and runs its hypothetical moves on a private copy of the board.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GameState {
    board: Board,
    history: History<MoveRecord>,
    turn: Color,
    kings: [PieceId; 2],
}

#[cfg(test)]
impl Arbitrary for GameState {
    type Parameters = ();
    type Strategy = Map<(Range<usize>, SelectorStrategy), fn((usize, Selector)) -> GameState>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (0..64, any::<Selector>()).prop_map(|(n, selector)| {
            let mut game = GameState::default();

            for _ in 0..n {
                let Some(m) = selector.try_select(game.moves()) else {
                    break;
                };

                let m = match m.is_promotion() {
                    false => m,
                    true => {
                        let p = selector.select(Promotion::iter());
                        game.promote(m, p).expect("expected promotion")
                    }
                };

                game.make_move(m).expect("expected legal move");
            }

            game
        })
    }
}

/// The standard arrangement, white to move.
impl Default for GameState {
    fn default() -> Self {
        GameState::new(Setup::default()).expect("expected standard arrangement to be legal")
    }
}

impl GameState {
    /// Starts a game from a [`Setup`], which must have exactly one king per side.
    pub fn new(setup: Setup) -> Result<Self, IllegalSetup> {
        let mut board = Board::new();
        let mut kings = [None; 2];

        for p in setup.placements {
            if !p.square.is_valid() {
                return Err(IllegalSetup::InvalidSquare(p.square));
            } else if board.piece_at(p.square).is_some() {
                return Err(IllegalSetup::OccupiedSquare(p.square));
            }

            let piece = board.place(p.color, p.role, p.square, p.moved);
            if p.role == Role::King && kings[p.color.index()].replace(piece.id()).is_some() {
                return Err(IllegalSetup::TooManyKings(p.color));
            }
        }

        let [Some(white), Some(black)] = kings else {
            let missing = if kings[0].is_none() { Color::White } else { Color::Black };
            return Err(IllegalSetup::MissingKing(missing));
        };

        Ok(GameState {
            board,
            history: History::new(),
            turn: setup.turn,
            kings: [white, black],
        })
    }

    /// The side to move.
    #[inline(always)]
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// The current [`Board`].
    #[inline(always)]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The moves played so far, including the ones undone but not yet discarded.
    #[inline(always)]
    pub fn history(&self) -> &History<MoveRecord> {
        &self.history
    }

    /// The [`Piece`] on a [`Square`], if any.
    #[inline(always)]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board.piece_at(sq)
    }

    /// The king of a side.
    #[inline(always)]
    pub fn king(&self, side: Color) -> Piece {
        self.board.piece(self.kings[side.index()])
    }

    /// The most recently applied move, if any.
    #[inline(always)]
    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.history.top()
    }

    fn legal(&self, scratch: &mut Board, piece: &Piece) -> Moves {
        let king = self.kings[piece.color().index()];
        let mut moves = movement::moves(&self.board, piece, self.last_move());
        moves.retain(|m| !scratch.hypothetically(*m).is_threatened(king));
        moves
    }

    /// The legal moves of a piece, whether it is its side's turn or not.
    ///
    /// Promotions are pending and must be [completed](`Self::promote`) before being played.
    pub fn legal_moves(&self, id: PieceId) -> Moves {
        let mut scratch = self.board.clone();
        self.legal(&mut scratch, &self.board.piece(id))
    }

    /// The legal moves of every piece of the side to move.
    pub fn moves(&self) -> Vec<MoveRecord> {
        let mut scratch = self.board.clone();
        self.board
            .pieces_of(self.turn)
            .flat_map(|p| self.legal(&mut scratch, &p))
            .collect()
    }

    fn has_legal_moves(&self) -> bool {
        let mut scratch = self.board.clone();
        self.board
            .pieces_of(self.turn)
            .any(|p| !self.legal(&mut scratch, &p).is_empty())
    }

    /// Whether the king of a side is under attack.
    #[inline(always)]
    pub fn under_check(&self, side: Color) -> bool {
        self.board.is_threatened(self.kings[side.index()])
    }

    /// Whether the side to move is in [check].
    ///
    /// [check]: https://www.chessprogramming.org/Check
    #[inline(always)]
    pub fn is_check(&self) -> bool {
        self.under_check(self.turn)
    }

    /// Whether the side to move is [checkmated].
    ///
    /// [checkmated]: https://www.chessprogramming.org/Checkmate
    pub fn is_checkmate(&self) -> bool {
        self.is_check() && !self.has_legal_moves()
    }

    /// Whether the side to move is [stalemated].
    ///
    /// [stalemated]: https://www.chessprogramming.org/Stalemate
    pub fn is_stalemate(&self) -> bool {
        !self.is_check() && !self.has_legal_moves()
    }

    /// The [`Outcome`] of the game, if it has ended.
    pub fn outcome(&self) -> Option<Outcome> {
        match (self.is_check(), self.has_legal_moves()) {
            (_, true) => None,
            (true, false) => Some(Outcome::Checkmate(!self.turn)),
            (false, false) => Some(Outcome::Stalemate),
        }
    }

    /// Completes a pending promotion with the chosen [`Promotion`].
    ///
    /// The new piece receives the next free id of the board's arena.
    pub fn promote(&self, m: MoveRecord, p: Promotion) -> Result<MoveRecord, NotAPromotion> {
        let id = self.board.pieces().next_id();
        m.complete(Piece::new(id, m.color(), p.into()))
    }

    /// Whether a move is among the legal moves of its piece.
    ///
    /// A completed promotion must allocate the next free id, ids are never reused.
    fn is_available(&self, m: &MoveRecord) -> bool {
        self.legal_moves(m.piece()).into_iter().any(|l| match *m.kind() {
            MoveKind::Promotion {
                piece: Some(new), ..
            } => new.id() == self.board.pieces().next_id() && l.complete(new) == Ok(*m),

            _ => l == *m,
        })
    }

    /// Plays a legal move of the side to move.
    #[instrument(level = "debug", skip(self, m), fields(%m), err)]
    pub fn make_move(&mut self, m: MoveRecord) -> Result<(), IllegalMove> {
        if m.color() != self.turn {
            return Err(IllegalMove::WrongTurn(m.color()));
        } else if !m.is_complete() {
            return Err(IllegalMove::IncompletePromotion);
        } else if !self.is_available(&m) {
            return Err(IllegalMove::Unavailable(m));
        }

        self.play_unchecked(m);
        Ok(())
    }

    /// Plays a move without checking whether it is legal.
    pub(crate) fn play_unchecked(&mut self, m: MoveRecord) {
        self.board.apply(&m);
        self.history.push(m);
        self.turn = !self.turn;
    }

    /// Takes back the last move played, if any.
    #[instrument(level = "debug", skip(self), ret)]
    pub fn undo_move(&mut self) -> bool {
        let Some(m) = self.history.back() else {
            return false;
        };

        debug!(%m, "undoing");
        self.board.undo(m);
        self.turn = !self.turn;
        true
    }

    /// Plays again the last move taken back, if any.
    #[instrument(level = "debug", skip(self), ret)]
    pub fn redo_move(&mut self) -> bool {
        let Some(m) = self.history.forward() else {
            return false;
        };

        debug!(%m, "redoing");
        self.board.apply(m);
        self.turn = !self.turn;
        true
    }

    /// The [`Transcript`] of the moves applied since the start of the game.
    pub fn transcript(&self) -> Transcript {
        let mut game = self.clone();
        while game.undo_move() {}

        let first = game.turn;
        let mut sans = Vec::with_capacity(self.history.cursor());
        for m in self.history.iter() {
            sans.push(San::encode(&game, m));
            game.redo_move();
        }

        Transcript::new(first, sans)
    }

    /// Decodes and plays every move of a [`Transcript`] in order.
    ///
    /// Nothing is played unless the transcript starts with the side to move.
    /// Moves that precede the offending token remain played.
    #[instrument(level = "debug", skip(self, transcript), fields(moves = transcript.len()), err)]
    pub fn replay(&mut self, transcript: &Transcript) -> Result<(), ReplayError> {
        if !transcript.is_empty() && transcript.first() != self.turn {
            return Err(ReplayError::WrongTurn {
                first: transcript.first(),
                turn: self.turn,
            });
        }

        for (index, san) in transcript.iter().enumerate() {
            let m = san.resolve(self).map_err(|source| ReplayError::Unplayable {
                index,
                san: san.clone(),
                source,
            })?;

            self.make_move(m).expect("expected legal move");
        }

        Ok(())
    }
}

impl FromStr for GameState {
    type Err = ParseGameError;

    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(GameState::new(s.parse()?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::decode;
    use proptest::sample::Selector;
    use test_strategy::proptest;

    fn game(fen: &str) -> GameState {
        fen.parse().unwrap()
    }

    #[proptest]
    fn legal_moves_never_leave_the_king_in_check(
        #[filter(!#_game.moves().is_empty())] _game: GameState,
        #[map(|s: Selector| s.select(#_game.moves()))] m: MoveRecord,
        p: Promotion,
    ) {
        let mut game = _game.clone();
        let m = match m.is_promotion() {
            true => game.promote(m, p)?,
            false => m,
        };

        game.make_move(m)?;
        assert!(!game.under_check(m.color()));
    }

    #[proptest]
    fn make_move_then_undo_restores_the_game(
        #[filter(!#_game.moves().is_empty())] _game: GameState,
        #[map(|s: Selector| s.select(#_game.moves()))] m: MoveRecord,
        p: Promotion,
    ) {
        let mut game = _game.clone();
        let m = match m.is_promotion() {
            true => game.promote(m, p)?,
            false => m,
        };

        game.make_move(m)?;
        assert_eq!(game.turn(), !_game.turn());
        assert!(game.undo_move());
        assert_eq!(game.board(), _game.board());
        assert_eq!(game.turn(), _game.turn());
        assert_eq!(game.history().cursor(), _game.history().cursor());
    }

    #[proptest]
    fn undo_then_redo_is_an_identity(#[filter(#game.history().cursor() > 0)] game: GameState) {
        let mut g = game.clone();
        assert!(g.undo_move());
        assert!(g.redo_move());
        assert_eq!(g, game);
    }

    #[proptest]
    fn redo_is_a_no_op_at_the_end_of_history(game: GameState) {
        let mut g = game.clone();
        assert!(!g.redo_move());
        assert_eq!(g, game);
    }

    #[test]
    fn undo_is_a_no_op_at_the_start_of_the_game() {
        let mut g = GameState::default();
        assert!(!g.undo_move());
        assert_eq!(g, GameState::default());
    }

    #[proptest]
    fn make_move_after_undo_discards_the_redo_branch(
        #[filter(#_game.history().cursor() > 0)] _game: GameState,
    ) {
        let mut game = _game.clone();
        game.undo_move();
        let m = game.moves()[0];
        let m = match m.is_promotion() {
            true => game.promote(m, Promotion::Queen)?,
            false => m,
        };

        game.make_move(m)?;
        assert_eq!(game.history().len(), game.history().cursor());
        assert!(!game.redo_move());
    }

    #[proptest]
    fn make_move_fails_if_not_the_side_to_move(
        #[filter(!#_game.moves().is_empty())] _game: GameState,
        #[map(|s: Selector| s.select(#_game.moves()))] m: MoveRecord,
    ) {
        let mut game = _game.clone();
        game.turn = !game.turn;
        assert_eq!(game.make_move(m), Err(IllegalMove::WrongTurn(m.color())));
        game.turn = !game.turn;
        assert_eq!(game, _game);
    }

    #[test]
    fn make_move_fails_if_promotion_is_incomplete() {
        let mut g = game("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let pawn = g.piece_at("a7".parse().unwrap()).unwrap();
        let m = g.legal_moves(pawn.id())[0];
        assert_eq!(g.make_move(m), Err(IllegalMove::IncompletePromotion));

        let m = g.promote(m, Promotion::Knight).unwrap();
        assert_eq!(g.make_move(m), Ok(()));
        assert_eq!(g.piece_at("a8".parse().unwrap()).map(|p| p.role()), Some(Role::Knight));
    }

    #[test]
    fn make_move_fails_if_move_is_stale() {
        let mut g = GameState::default();
        let m = g.moves()[0];
        g.make_move(m).unwrap();
        let reply = g.moves()[0];
        g.make_move(reply).unwrap();
        assert_eq!(g.make_move(m), Err(IllegalMove::Unavailable(m)));
    }

    #[test]
    fn promoted_pieces_may_not_reuse_ids_of_captured_pieces() {
        let mut g = game("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let pawn = g.piece_at("a7".parse().unwrap()).unwrap();
        let knight = g.piece_at("b8".parse().unwrap()).unwrap();
        let m = g
            .legal_moves(pawn.id())
            .into_iter()
            .find(|m| m.is_capture())
            .unwrap();

        let m = m.complete(Piece::new(knight.id(), Color::White, Role::Queen)).unwrap();
        assert_eq!(g.make_move(m), Err(IllegalMove::Unavailable(m)));
    }

    #[test]
    fn promoted_pieces_may_not_take_over_ids_of_pieces_captured_earlier() {
        let mut g = game("4k3/P7/8/8/8/8/7r/4KB1R b Q - 0 1");
        let rook = g.piece_at("h1".parse().unwrap()).unwrap();
        assert!(g.board().has_moved(rook.id()));

        let m = decode("Rxh1", &g).unwrap();
        g.make_move(m).unwrap();
        assert_eq!(g.board().position_of(rook.id()), None);

        let pawn = g.piece_at("a7".parse().unwrap()).unwrap();
        let m = g.legal_moves(pawn.id())[0];
        let m = m.complete(Piece::new(rook.id(), Color::White, Role::Rook)).unwrap();
        assert_eq!(g.make_move(m), Err(IllegalMove::Unavailable(m)));
        assert_eq!(g.board().position_of(rook.id()), None);

        assert!(g.undo_move());
        assert_eq!(g.board().position_of(rook.id()), Some("h1".parse().unwrap()));
        assert!(g.board().has_moved(rook.id()));
    }

    #[proptest]
    fn undone_promotions_are_played_again_with_fresh_ids(p: Promotion) {
        let mut g = game("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let pawn = g.piece_at("a7".parse()?).unwrap();
        let m = g.legal_moves(pawn.id())[0];

        let first = g.promote(m, p)?;
        g.make_move(first)?;
        assert!(g.undo_move());
        assert_eq!(g.make_move(first), Err(IllegalMove::Unavailable(first)));

        let again = g.promote(m, p)?;
        assert_ne!(again, first);
        g.make_move(again)?;
        assert_eq!(g.piece_at("a8".parse()?).map(|q| q.role()), Some(p.into()));
    }

    #[test]
    fn pinned_pieces_may_not_expose_the_king() {
        let g = game("4k3/4r3/8/8/8/8/4B3/4K3 w - - 0 1");
        let bishop = g.piece_at("e2".parse().unwrap()).unwrap();
        assert!(g.legal_moves(bishop.id()).is_empty());
    }

    #[test]
    fn king_may_not_castle_into_check() {
        let g = game("4k1r1/8/8/8/8/8/8/4K2R w K - 0 1");
        let king = g.king(Color::White);
        assert!(g.legal_moves(king.id()).iter().all(|m| !m.is_castling()));
    }

    #[test]
    fn checkmate_requires_check_and_no_legal_moves() {
        let g = game("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1");
        assert!(g.is_check());
        assert!(g.is_checkmate());
        assert!(!g.is_stalemate());
        assert_eq!(g.outcome(), Some(Outcome::Checkmate(Color::White)));
    }

    #[test]
    fn stalemate_requires_no_check_and_no_legal_moves() {
        let g = game("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert!(!g.is_check());
        assert!(g.is_stalemate());
        assert!(!g.is_checkmate());
        assert_eq!(g.outcome(), Some(Outcome::Stalemate));
    }

    #[proptest]
    fn checkmate_and_stalemate_are_mutually_exclusive(game: GameState) {
        assert!(!(game.is_checkmate() && game.is_stalemate()));
        assert_eq!(game.outcome().is_some(), game.moves().is_empty());
    }

    #[proptest]
    fn moves_are_the_legal_moves_of_the_side_to_move(game: GameState) {
        let expected: Vec<_> = game
            .board()
            .pieces_of(game.turn())
            .flat_map(|p| game.legal_moves(p.id()))
            .collect();

        assert_eq!(game.moves(), expected);
    }

    #[proptest]
    fn promote_fails_for_moves_that_are_not_promotions(
        #[filter(!#_game.moves().is_empty())] _game: GameState,
        #[map(|s: Selector| s.select(#_game.moves()))]
        #[filter(!#m.is_promotion())]
        m: MoveRecord,
        p: Promotion,
    ) {
        assert_eq!(_game.promote(m, p), Err(NotAPromotion));
    }

    #[test]
    fn parsing_game_fails_without_exactly_one_king_per_side() {
        assert_eq!(
            "8/8/8/8/8/8/8/4K3 w - - 0 1".parse::<GameState>(),
            Err(ParseGameError::IllegalSetup(IllegalSetup::MissingKing(Color::Black)))
        );

        assert_eq!(
            "4k3/8/8/8/8/8/8/3KK3 w - - 0 1".parse::<GameState>(),
            Err(ParseGameError::IllegalSetup(IllegalSetup::TooManyKings(Color::White)))
        );
    }

    #[test]
    fn new_fails_if_pieces_overlap() {
        let mut setup = Setup::default();
        let mut p = setup.placements[0];
        p.role = Role::Queen;
        setup.placements.push(p);
        assert_eq!(GameState::new(setup), Err(IllegalSetup::OccupiedSquare(p.square)));
    }

    #[proptest]
    fn replaying_the_transcript_reproduces_the_game(game: GameState) {
        let mut g = GameState::default();
        g.replay(&game.transcript())?;
        assert_eq!(g.board(), game.board());
        assert_eq!(g.turn(), game.turn());
    }
}
