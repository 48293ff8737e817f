use crate::chess::{movement, Bitboard, Color, File, MoveKind, MoveRecord, Piece, PieceId};
use crate::chess::{PieceSet, Rank, Role, Square};
use crate::util::Enum;
use std::fmt::{self, Write};
use std::ops::Deref;

/// The placement of pieces on the chess board.
///
/// The board maps squares to the pieces standing on them and back, and remembers
/// whether each piece has ever moved. It knows nothing about legality, it plays
/// whatever [`MoveRecord`] it is handed.
#[derive(Debug, Clone)]
pub struct Board {
    pieces: PieceSet,
    squares: [Option<PieceId>; 64],
    positions: Vec<Option<Square>>,
    moved: Vec<bool>,
    colors: [Bitboard; 2],
}

impl Default for Board {
    #[inline(always)]
    fn default() -> Self {
        Board {
            pieces: PieceSet::new(),
            squares: [None; 64],
            positions: Vec::new(),
            moved: Vec::new(),
            colors: [Bitboard::empty(); 2],
        }
    }
}

/// Two boards are equal if the same pieces stand on the same squares with the same moved flags.
///
/// Pieces that are not on the board do not take part in the comparison.
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.squares == other.squares
            && self.iter().all(|(p, _)| {
                other.pieces.get(p.id()) == Some(&p) && self.has_moved(p.id()) == other.has_moved(p.id())
            })
    }
}

impl Eq for Board {}

impl Board {
    /// Constructs an empty board.
    #[inline(always)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a new piece and places it on an empty [`Square`].
    pub fn place(&mut self, color: Color, role: Role, sq: Square, moved: bool) -> Piece {
        debug_assert!(self.piece_at(sq).is_none(), "square {sq} is occupied");
        let piece = self.pieces.insert(color, role);
        self.put(piece.id(), sq);
        self.set_moved(piece.id(), moved);
        piece
    }

    /// The arena of every piece ever allocated on this board.
    #[inline(always)]
    pub fn pieces(&self) -> &PieceSet {
        &self.pieces
    }

    /// The piece with the given id, whether on the board or not.
    #[inline(always)]
    pub fn piece(&self, id: PieceId) -> Piece {
        self.pieces[id]
    }

    /// The [`Piece`] on a [`Square`], if any.
    #[inline(always)]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        let id = self.squares[sq.index()?]?;
        Some(self.pieces[id])
    }

    /// The [`Square`] a piece stands on, if it is on the board.
    #[inline(always)]
    pub fn position_of(&self, id: PieceId) -> Option<Square> {
        *self.positions.get(id.index())?
    }

    /// Whether a piece has ever moved.
    #[inline(always)]
    pub fn has_moved(&self, id: PieceId) -> bool {
        self.moved.get(id.index()).copied().unwrap_or(false)
    }

    /// An iterator over the pieces on the board and where they stand.
    pub fn iter(&self) -> impl Iterator<Item = (Piece, Square)> + '_ {
        Square::iter().filter_map(|sq| Some((self.piece_at(sq)?, sq)))
    }

    /// The pieces of a [`Color`] on the board.
    pub fn pieces_of(&self, side: Color) -> impl Iterator<Item = Piece> + '_ {
        self.by_color(side)
            .into_iter()
            .filter_map(|sq| self.piece_at(sq))
    }

    /// The pieces of a [`Role`] on the board, indexed by [`Color`].
    pub fn pieces_by_role(&self, role: Role) -> [Vec<Piece>; 2] {
        let mut pieces: [Vec<Piece>; 2] = Default::default();
        for (p, _) in self.iter().filter(|(p, _)| p.role() == role) {
            pieces[p.color().index()].push(p);
        }

        pieces
    }

    /// [`Square`]s occupied by any piece.
    #[inline(always)]
    pub fn occupied(&self) -> Bitboard {
        self.colors[0] | self.colors[1]
    }

    /// [`Square`]s occupied by the pieces of a [`Color`].
    #[inline(always)]
    pub fn by_color(&self, side: Color) -> Bitboard {
        self.colors[side.index()]
    }

    /// [`Square`]s attacked by the pieces of a [`Color`].
    pub fn attacked(&self, by: Color) -> Bitboard {
        self.pieces_of(by)
            .fold(Bitboard::empty(), |bb, p| bb | movement::attacks(self, &p))
    }

    /// Whether the piece with the given id is on the board and under attack.
    #[inline(always)]
    pub fn is_threatened(&self, id: PieceId) -> bool {
        let piece = self.piece(id);
        self.position_of(id)
            .is_some_and(|sq| self.attacked(!piece.color()).contains(sq))
    }

    /// Plays a [`MoveRecord`].
    ///
    /// A pending promotion is played as a plain pawn advance.
    pub fn apply(&mut self, m: &MoveRecord) {
        debug_assert_eq!(self.position_of(m.piece()), Some(m.whence()));

        match *m.kind() {
            MoveKind::Normal { capture } => {
                if let Some(c) = capture {
                    self.lift(c);
                }

                self.relocate(m.piece(), m.whither());
            }

            MoveKind::EnPassant { capture, .. } => {
                self.lift(capture);
                self.relocate(m.piece(), m.whither());
            }

            MoveKind::Castle { rook, whither, .. } => {
                self.relocate(m.piece(), m.whither());
                self.relocate(rook, whither);
                self.set_moved(rook, true);
            }

            MoveKind::Promotion { capture, piece } => {
                if let Some(c) = capture {
                    self.lift(c);
                }

                match piece {
                    None => self.relocate(m.piece(), m.whither()),
                    Some(new) => {
                        self.lift(m.piece());
                        self.pieces.store(new);
                        self.put(new.id(), m.whither());
                        self.set_moved(new.id(), true);
                    }
                }
            }
        }

        self.set_moved(m.piece(), true);
    }

    /// Reverts a [`MoveRecord`], which must be the last one played.
    pub fn undo(&mut self, m: &MoveRecord) {
        match *m.kind() {
            MoveKind::Normal { capture } => {
                self.relocate(m.piece(), m.whence());
                if let Some(c) = capture {
                    self.put(c, m.whither());
                }
            }

            MoveKind::EnPassant { capture, square, moved } => {
                self.relocate(m.piece(), m.whence());
                self.put(capture, square);
                self.set_moved(capture, moved);
            }

            MoveKind::Castle {
                rook,
                whence,
                moved,
                ..
            } => {
                self.relocate(rook, whence);
                self.relocate(m.piece(), m.whence());
                self.set_moved(rook, moved);
            }

            MoveKind::Promotion { capture, piece } => {
                match piece {
                    None => self.relocate(m.piece(), m.whence()),
                    Some(new) => {
                        self.lift(new.id());
                        self.set_moved(new.id(), false);
                        self.put(m.piece(), m.whence());
                    }
                }

                if let Some(c) = capture {
                    self.put(c, m.whither());
                }
            }
        }

        self.set_moved(m.piece(), m.moved());
    }

    /// Plays a [`MoveRecord`] for as long as the returned guard lives.
    #[inline(always)]
    pub fn hypothetically(&mut self, m: MoveRecord) -> Hypothetical<'_> {
        self.apply(&m);
        Hypothetical { board: self, m }
    }

    fn put(&mut self, id: PieceId, sq: Square) {
        debug_assert!(sq.is_valid(), "square {sq} is off the board");
        let Some(i) = sq.index() else {
            return;
        };

        debug_assert_eq!(self.squares[i], None, "square {sq} is occupied");
        self.squares[i] = Some(id);
        let side = self.pieces[id].color().index();
        self.colors[side] = self.colors[side].with(sq);

        if self.positions.len() <= id.index() {
            self.positions.resize(id.index() + 1, None);
        }

        self.positions[id.index()] = Some(sq);
    }

    fn lift(&mut self, id: PieceId) {
        let sq = self.positions.get_mut(id.index()).and_then(Option::take);
        match sq.zip(sq.and_then(|sq| sq.index())) {
            Some((sq, i)) => {
                let side = self.pieces[id].color().index();
                self.squares[i] = None;
                self.colors[side] = self.colors[side].without(sq);
            }

            None => debug_assert!(false, "piece {id} is not on the board"),
        }
    }

    fn relocate(&mut self, id: PieceId, sq: Square) {
        self.lift(id);
        self.put(id, sq);
    }

    fn set_moved(&mut self, id: PieceId, moved: bool) {
        if self.moved.len() <= id.index() {
            self.moved.resize(id.index() + 1, false);
        }

        self.moved[id.index()] = moved;
    }
}

/// Prints a diagram of the board, eighth rank first.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            write!(f, "{rank} ")?;
            for file in File::iter() {
                match self.piece_at(Square::new(file, rank)) {
                    Some(p) => write!(f, " {p}")?,
                    None => f.write_str(" .")?,
                }
            }

            f.write_char('\n')?;
        }

        f.write_str("  ")?;
        for file in File::iter() {
            write!(f, " {file}")?;
        }

        Ok(())
    }
}

/// A [`Board`] on which a [`MoveRecord`] has been played only temporarily.
///
/// The move is undone when the guard is dropped.
#[derive(Debug)]
pub struct Hypothetical<'a> {
    board: &'a mut Board,
    m: MoveRecord,
}

impl Hypothetical<'_> {
    /// The move being tried.
    #[inline(always)]
    pub fn record(&self) -> &MoveRecord {
        &self.m
    }
}

impl Deref for Hypothetical<'_> {
    type Target = Board;

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        self.board
    }
}

impl Drop for Hypothetical<'_> {
    #[inline(always)]
    fn drop(&mut self) {
        self.board.undo(&self.m);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::{GameState, Promotion};
    use proptest::sample::Selector;
    use test_strategy::proptest;

    #[proptest]
    fn placement_maps_are_mutual_inverses(game: GameState) {
        let board = game.board();
        for sq in Square::iter() {
            if let Some(p) = board.piece_at(sq) {
                assert_eq!(board.position_of(p.id()), Some(sq));
            }
        }

        for p in board.pieces().iter() {
            if let Some(sq) = board.position_of(p.id()) {
                assert_eq!(board.piece_at(sq), Some(*p));
            }
        }
    }

    #[proptest]
    fn pieces_of_returns_pieces_of_a_color(game: GameState, c: Color) {
        for p in game.board().pieces_of(c) {
            assert_eq!(p.color(), c);
        }
    }

    #[proptest]
    fn pieces_by_role_partitions_pieces_of_a_role_by_color(game: GameState, r: Role) {
        let board = game.board();
        for c in Color::iter() {
            let expected: Vec<_> = board.pieces_of(c).filter(|p| p.role() == r).collect();
            assert_eq!(board.pieces_by_role(r)[c.index()], expected);
        }
    }

    #[proptest]
    fn by_color_returns_squares_occupied_by_a_color(game: GameState, c: Color) {
        let board = game.board();
        for sq in board.by_color(c) {
            assert_eq!(board.piece_at(sq).map(|p| p.color()), Some(c));
        }

        assert_eq!(board.by_color(c) | board.by_color(!c), board.occupied());
    }

    #[proptest]
    fn apply_moves_the_piece_to_its_destination(
        #[filter(!#_game.moves().is_empty())] _game: GameState,
        #[map(|s: Selector| s.select(#_game.moves()))] m: MoveRecord,
    ) {
        let mut board = _game.board().clone();
        board.apply(&m);
        assert_eq!(board.position_of(m.piece()), Some(m.whither()));
        assert!(board.has_moved(m.piece()));
    }

    #[proptest]
    fn apply_then_undo_restores_the_board(
        #[filter(!#_game.moves().is_empty())] _game: GameState,
        #[map(|s: Selector| s.select(#_game.moves()))] m: MoveRecord,
        p: Promotion,
    ) {
        let m = match m.is_promotion() {
            true => _game.promote(m, p)?,
            false => m,
        };

        let mut board = _game.board().clone();
        board.apply(&m);
        board.undo(&m);
        assert_eq!(&board, _game.board());

        for (piece, _) in _game.board().iter() {
            assert_eq!(board.has_moved(piece.id()), _game.board().has_moved(piece.id()));
        }
    }

    #[proptest]
    fn captured_pieces_are_removed_from_the_board(
        #[filter(#_game.moves().iter().any(|m| m.is_capture()))] _game: GameState,
        #[map(|s: Selector| s.select(#_game.moves().into_iter().filter(|m| m.is_capture())))]
        m: MoveRecord,
    ) {
        let mut board = _game.board().clone();
        let capture = m.capture().unwrap();
        board.apply(&m);
        assert_eq!(board.position_of(capture), None);
        board.undo(&m);
        assert!(board.position_of(capture).is_some());
    }

    #[test]
    fn promotion_replaces_the_pawn_with_the_new_piece() -> Result<(), Box<dyn std::error::Error>> {
        let game: GameState = "4k3/P7/8/8/8/8/8/4K3 w - - 0 1".parse()?;
        let pawn = game.board().piece_at("a7".parse()?).ok_or("expected pawn")?;
        let m = game.promote(game.legal_moves(pawn.id())[0], Promotion::Queen)?;

        let mut board = game.board().clone();
        board.apply(&m);

        let queen = board.piece_at("a8".parse()?).ok_or("expected queen")?;
        assert_eq!((queen.color(), queen.role()), (Color::White, Role::Queen));
        assert_ne!(queen.id(), pawn.id());
        assert_eq!(board.position_of(pawn.id()), None);

        board.undo(&m);
        assert_eq!(board.position_of(queen.id()), None);
        assert_eq!(&board, game.board());

        Ok(())
    }

    #[test]
    fn castling_relocates_king_and_rook() -> Result<(), Box<dyn std::error::Error>> {
        let game: GameState = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse()?;
        let king = game.board().piece_at("e1".parse()?).ok_or("expected king")?;
        let rook = game.board().piece_at("h1".parse()?).ok_or("expected rook")?;
        let m = game
            .legal_moves(king.id())
            .into_iter()
            .find(|m| m.is_castling() && m.whither() == "g1".parse().unwrap())
            .ok_or("expected castling")?;

        let mut board = game.board().clone();
        board.apply(&m);
        assert_eq!(board.position_of(king.id()), Some("g1".parse()?));
        assert_eq!(board.position_of(rook.id()), Some("f1".parse()?));
        assert!(board.has_moved(rook.id()));

        board.undo(&m);
        assert!(!board.has_moved(rook.id()));
        assert!(!board.has_moved(king.id()));
        assert_eq!(&board, game.board());

        Ok(())
    }

    #[proptest]
    fn hypothetical_move_is_undone_when_dropped(
        #[filter(!#_game.moves().is_empty())] _game: GameState,
        #[map(|s: Selector| s.select(#_game.moves()))] m: MoveRecord,
    ) {
        let mut board = _game.board().clone();

        {
            let probe = board.hypothetically(m);
            assert_eq!(probe.record(), &m);
            assert_eq!(probe.position_of(m.piece()), Some(m.whither()));
        }

        assert_eq!(&board, _game.board());
    }

    #[test]
    fn board_prints_a_diagram() {
        let game = GameState::default();
        let diagram = game.board().to_string();
        let lines: Vec<_> = diagram.lines().collect();
        assert_eq!(lines[0], "8  r n b q k b n r");
        assert_eq!(lines[4], "4  . . . . . . . .");
        assert_eq!(lines[7], "1  R N B Q K B N R");
        assert_eq!(lines[8], "   a b c d e f g h");
    }
}
