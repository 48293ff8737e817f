//! Movement rules of each [`Role`].
//!
//! Attacks and pseudo-legal moves are computed with a single exhaustive case analysis
//! over the role of a piece, ignoring whether the move would expose its own king.

use crate::chess::{Bitboard, Board, File, MoveKind, MoveRecord, Piece, Role, Square};
use arrayvec::ArrayVec;

/// The pseudo-legal moves of a single piece.
pub type Moves = ArrayVec<MoveRecord, 32>;

const KNIGHT: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const ORTHOGONAL: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

fn directions(role: Role) -> &'static [(i8, i8)] {
    match role {
        Role::Bishop => &DIAGONAL,
        Role::Rook => &ORTHOGONAL,
        Role::Queen => &KING,
        Role::Pawn | Role::Knight | Role::King => &[],
    }
}

fn jumps(from: Square, offsets: &[(i8, i8)]) -> Bitboard {
    offsets.iter().map(|&(df, dr)| from.offset(df, dr)).collect()
}

fn slides(board: &Board, from: Square, directions: &[(i8, i8)]) -> Bitboard {
    let occupied = board.occupied();
    let mut reach = Bitboard::empty();

    for &(df, dr) in directions {
        let mut sq = from.offset(df, dr);
        while sq.is_valid() {
            reach = reach.with(sq);
            if occupied.contains(sq) {
                break;
            }

            sq = sq.offset(df, dr);
        }
    }

    reach
}

/// The squares a piece threatens, which never includes squares its own side occupies.
///
/// En passant captures and castling are not attacks.
pub fn attacks(board: &Board, piece: &Piece) -> Bitboard {
    let Some(from) = board.position_of(piece.id()) else {
        return Bitboard::empty();
    };

    let reach = match piece.role() {
        Role::Pawn => {
            let dr = piece.color().forward();
            jumps(from, &[(-1, dr), (1, dr)])
        }

        Role::Knight => jumps(from, &KNIGHT),
        Role::King => jumps(from, &KING),
        r @ (Role::Bishop | Role::Rook | Role::Queen) => slides(board, from, directions(r)),
    };

    reach & !board.by_color(piece.color())
}

/// The pseudo-legal moves of a piece.
///
/// The `last` move played on the board decides whether en passant is possible.
/// Promotions are yielded pending, one per destination square.
pub fn moves(board: &Board, piece: &Piece, last: Option<&MoveRecord>) -> Moves {
    let mut moves = Moves::new();

    let Some(from) = board.position_of(piece.id()) else {
        return moves;
    };

    match piece.role() {
        Role::Pawn => pawn(board, piece, from, last, &mut moves),

        Role::King => {
            for whither in attacks(board, piece) {
                moves.push(MoveRecord::normal(board, piece.id(), whither));
            }

            castles(board, piece, from, &mut moves);
        }

        Role::Knight | Role::Bishop | Role::Rook | Role::Queen => {
            for whither in attacks(board, piece) {
                moves.push(MoveRecord::normal(board, piece.id(), whither));
            }
        }
    }

    moves
}

fn pawn(board: &Board, piece: &Piece, from: Square, last: Option<&MoveRecord>, moves: &mut Moves) {
    let side = piece.color();
    let dr = side.forward();
    let last_rank = side.opponent().home_rank() as i8;

    let advance = |whither: Square, moves: &mut Moves| match whither.y() == last_rank {
        true => moves.push(MoveRecord::pending_promotion(board, piece.id(), whither)),
        false => moves.push(MoveRecord::normal(board, piece.id(), whither)),
    };

    let single = from.offset(0, dr);
    if single.is_valid() && board.piece_at(single).is_none() {
        advance(single, moves);

        let double = single.offset(0, dr);
        if !board.has_moved(piece.id()) && double.is_valid() && board.piece_at(double).is_none() {
            advance(double, moves);
        }
    }

    for whither in attacks(board, piece) {
        if board.piece_at(whither).is_some_and(|p| p.color() != side) {
            advance(whither, moves);
        }
    }

    if let Some(passed) = last.filter(|m| is_double_advance(board, m) && m.color() != side) {
        let beside = passed.whither();
        if beside.y() == from.y() && (beside.x() - from.x()).abs() == 1 {
            let whither = beside.offset(0, dr);
            moves.push(MoveRecord::en_passant(board, piece.id(), whither, passed.piece()));
        }
    }
}

fn is_double_advance(board: &Board, m: &MoveRecord) -> bool {
    matches!(m.kind(), MoveKind::Normal { .. })
        && board.piece(m.piece()).role() == Role::Pawn
        && (m.whither().y() - m.whence().y()).abs() == 2
        && board.position_of(m.piece()) == Some(m.whither())
}

/// Castling requires unmoved king and rook on their original squares, an empty path between
/// them, and a king that is neither in check nor passing over an attacked square.
///
/// Whether the destination square is attacked is left to the legality filter.
fn castles(board: &Board, king: &Piece, from: Square, moves: &mut Moves) {
    if board.has_moved(king.id()) || from != Square::new(File::E, king.color().home_rank()) {
        return;
    }

    let mut threats = None;

    for (corner, step) in [(7, 1), (0, -1)] {
        let Some(rook) = board.piece_at(Square::from_coords(corner, from.y())) else {
            continue;
        };

        if rook.role() != Role::Rook || rook.color() != king.color() || board.has_moved(rook.id()) {
            continue;
        }

        let mut path = (1..).map(|i| from.offset(i * step, 0)).take_while(|sq| sq.x() != corner);
        if path.any(|sq| board.piece_at(sq).is_some()) {
            continue;
        }

        let transit = from.offset(step, 0);
        let whither = from.offset(2 * step, 0);
        if !whither.is_valid() {
            continue;
        }

        let threats = *threats.get_or_insert_with(|| board.attacked(!king.color()));
        if threats.contains(from) || threats.contains(transit) {
            continue;
        }

        moves.push(MoveRecord::castle(board, king.id(), whither, rook.id(), transit));
    }
}
