//! Legal move generation and check detection for `Board`.
//!
//! Pseudo-legal moves are generated per piece from (file, rank) steps and
//! filtered by playing each one and testing whether the mover's king is
//! left attacked.

use crate::board::{Board, Move};
use crate::position::GameStatus;
use crate::types::*;

const ROOK_STEPS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const BISHOP_STEPS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const KING_STEPS: [(i32, i32); 8] = [
    (0, 1), (0, -1), (1, 0), (-1, 0),
    (1, 1), (1, -1), (-1, 1), (-1, -1),
];
const KNIGHT_STEPS: [(i32, i32); 8] = [
    (1, 2), (2, 1), (2, -1), (1, -2),
    (-1, -2), (-2, -1), (-2, 1), (-1, 2),
];

const PROMOTIONS: [Piece; 4] = [QUEEN, ROOK, BISHOP, KNIGHT];

/// All legal moves for the side to move
pub fn legal_moves(board: &Board) -> Vec<Move> {
    let mover = board.side_to_move;
    let mut scratch = board.clone();
    pseudo_legal_moves(board)
        .into_iter()
        .filter(|&mv| {
            scratch.apply(mv);
            let legal = !is_in_check(&scratch, mover);
            scratch.revert();
            legal
        })
        .collect()
}

/// Moves that obey piece movement but may leave the own king attacked
pub fn pseudo_legal_moves(board: &Board) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    let side = board.side_to_move;

    for sq in 0..NUM_SQUARES {
        let piece = board.squares[sq];
        if owner(piece) != Some(side) {
            continue;
        }
        match piece_type(piece) {
            PAWN => pawn_moves(board, sq, side, &mut moves),
            KNIGHT => step_moves(board, sq, side, &KNIGHT_STEPS, &mut moves),
            BISHOP => slide_moves(board, sq, side, &BISHOP_STEPS, &mut moves),
            ROOK => slide_moves(board, sq, side, &ROOK_STEPS, &mut moves),
            QUEEN => {
                slide_moves(board, sq, side, &ROOK_STEPS, &mut moves);
                slide_moves(board, sq, side, &BISHOP_STEPS, &mut moves);
            }
            KING => {
                step_moves(board, sq, side, &KING_STEPS, &mut moves);
                castling_moves(board, sq, side, &mut moves);
            }
            _ => {}
        }
    }

    moves
}

fn push_pawn_move(
    from: usize,
    to: usize,
    captured: Piece,
    promo_rank: usize,
    moves: &mut Vec<Move>,
) {
    if rank_of(to) == promo_rank {
        for promo in PROMOTIONS {
            moves.push(Move::with_promotion(from, to, captured, promo));
        }
    } else {
        moves.push(Move::new(from, to, captured));
    }
}

fn pawn_moves(board: &Board, sq: usize, side: Side, moves: &mut Vec<Move>) {
    let (forward, start_rank, promo_rank) = match side {
        Side::White => (1, 1, BOARD_HEIGHT - 1),
        Side::Black => (-1, BOARD_HEIGHT - 2, 0),
    };

    if let Some(one) = offset_square(sq, 0, forward) {
        if board.squares[one] == EMPTY {
            push_pawn_move(sq, one, EMPTY, promo_rank, moves);
            if rank_of(sq) == start_rank {
                if let Some(two) = offset_square(one, 0, forward) {
                    if board.squares[two] == EMPTY {
                        moves.push(Move::new(sq, two, EMPTY));
                    }
                }
            }
        }
    }

    for df in [-1, 1] {
        let Some(to) = offset_square(sq, df, forward) else {
            continue;
        };
        let target = board.squares[to];
        if owner(target) == Some(side.opponent()) {
            push_pawn_move(sq, to, target, promo_rank, moves);
        } else if board.en_passant_square == Some(to) {
            moves.push(Move::en_passant(sq, to, make_piece(side.opponent(), PAWN)));
        }
    }
}

fn step_moves(board: &Board, sq: usize, side: Side, steps: &[(i32, i32)], moves: &mut Vec<Move>) {
    for &(df, dr) in steps {
        if let Some(to) = offset_square(sq, df, dr) {
            let target = board.squares[to];
            if owner(target) != Some(side) {
                moves.push(Move::new(sq, to, target));
            }
        }
    }
}

fn slide_moves(board: &Board, sq: usize, side: Side, steps: &[(i32, i32)], moves: &mut Vec<Move>) {
    for &(df, dr) in steps {
        let mut current = sq;
        while let Some(to) = offset_square(current, df, dr) {
            let target = board.squares[to];
            if owner(target) == Some(side) {
                break;
            }
            moves.push(Move::new(sq, to, target));
            if target != EMPTY {
                break;
            }
            current = to;
        }
    }
}

fn castling_moves(board: &Board, sq: usize, side: Side, moves: &mut Vec<Move>) {
    let (home, king_side, queen_side) = match side {
        Side::White => (4, CASTLE_WK, CASTLE_WQ),
        Side::Black => (60, CASTLE_BK, CASTLE_BQ),
    };
    let enemy = side.opponent();
    if sq != home || is_square_attacked(board, sq, enemy) {
        return;
    }

    let empty = |squares: &[usize]| squares.iter().all(|&s| board.squares[s] == EMPTY);
    let safe = |squares: &[usize]| squares.iter().all(|&s| !is_square_attacked(board, s, enemy));

    if board.castling_rights & king_side != 0
        && empty(&[home + 1, home + 2])
        && safe(&[home + 1, home + 2])
    {
        moves.push(Move::castling(sq, home + 2));
    }
    if board.castling_rights & queen_side != 0
        && empty(&[home - 1, home - 2, home - 3])
        && safe(&[home - 1, home - 2])
    {
        moves.push(Move::castling(sq, home - 2));
    }
}

/// Whether `sq` is attacked by any piece of `by`
pub fn is_square_attacked(board: &Board, sq: usize, by: Side) -> bool {
    let is = |s: Option<usize>, kinds: &[Piece]| {
        s.map(|s| board.squares[s])
            .is_some_and(|p| owner(p) == Some(by) && kinds.contains(&piece_type(p)))
    };

    // A pawn of `by` attacks diagonally forward, so look one rank behind.
    let behind = match by {
        Side::White => -1,
        Side::Black => 1,
    };
    if is(offset_square(sq, -1, behind), &[PAWN]) || is(offset_square(sq, 1, behind), &[PAWN]) {
        return true;
    }

    if KNIGHT_STEPS.iter().any(|&(df, dr)| is(offset_square(sq, df, dr), &[KNIGHT]))
        || KING_STEPS.iter().any(|&(df, dr)| is(offset_square(sq, df, dr), &[KING]))
    {
        return true;
    }

    let ray_hits = |steps: &[(i32, i32)], kinds: &[Piece]| {
        steps.iter().any(|&(df, dr)| {
            let mut current = sq;
            while let Some(next) = offset_square(current, df, dr) {
                if board.squares[next] != EMPTY {
                    return is(Some(next), kinds);
                }
                current = next;
            }
            false
        })
    };

    ray_hits(&ROOK_STEPS, &[ROOK, QUEEN]) || ray_hits(&BISHOP_STEPS, &[BISHOP, QUEEN])
}

/// Whether `side`'s king is attacked. A board without that king is never in check.
pub fn is_in_check(board: &Board, side: Side) -> bool {
    board
        .find_king(side)
        .is_some_and(|king| is_square_attacked(board, king, side.opponent()))
}

pub fn status(board: &Board) -> GameStatus {
    if !legal_moves(board).is_empty() {
        GameStatus::Ongoing
    } else if is_in_check(board, board.side_to_move) {
        GameStatus::Checkmate
    } else {
        GameStatus::Stalemate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::SearchPosition;

    fn perft(board: &mut Board, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = legal_moves(board);
        if depth == 1 {
            return moves.len() as u64;
        }
        let mut nodes = 0;
        for mv in moves {
            board.make_move(mv);
            nodes += perft(board, depth - 1);
            board.undo_move();
        }
        nodes
    }

    #[test]
    fn test_starting_position_move_counts() {
        let mut board = Board::new();
        assert_eq!(perft(&mut board, 1), 20);
        assert_eq!(perft(&mut board, 2), 400);
        assert_eq!(perft(&mut board, 3), 8902);
    }

    #[test]
    fn test_kiwipete_move_count() {
        let mut board = Board::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .expect("valid fen");
        assert_eq!(perft(&mut board, 1), 48);
        assert_eq!(perft(&mut board, 2), 2039);
    }

    #[test]
    fn test_checkmate_status() {
        // Back rank mate
        let board = Board::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").expect("valid fen");
        assert!(board.is_in_check());
        assert_eq!(board.status(), GameStatus::Checkmate);
    }

    #[test]
    fn test_stalemate_status() {
        let board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").expect("valid fen");
        assert!(!board.is_in_check());
        assert_eq!(board.status(), GameStatus::Stalemate);
    }

    #[test]
    fn test_pinned_piece_cannot_move() {
        // The e2 knight is pinned against the king by the e8 rook
        let board = Board::from_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1").expect("valid fen");
        assert!(legal_moves(&board).iter().all(|m| m.from_sq != 12));
    }
}
