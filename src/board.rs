//! Concrete chess board implementing the search contract.
//!
//! The board owns its own undo stack so the search can apply and revert
//! moves without carrying undo records around. Position hashes are kept
//! per ply for repetition counting.

use crate::move_generator;
use crate::position::{GameStatus, SearchMove, SearchPosition};
use crate::types::*;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Starting position FEN
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum MoveKind {
    #[default]
    Normal,
    Castling,
    EnPassant,
}

/// A chess move. `captured` is filled in by the move generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from_sq: usize,
    pub to_sq: usize,
    /// Promotion piece type, `EMPTY` if none
    pub promotion: Piece,
    pub captured: Piece,
    pub kind: MoveKind,
}

impl Move {
    pub fn new(from_sq: usize, to_sq: usize, captured: Piece) -> Self {
        Move {
            from_sq,
            to_sq,
            promotion: EMPTY,
            captured,
            kind: MoveKind::Normal,
        }
    }

    pub fn with_promotion(from_sq: usize, to_sq: usize, captured: Piece, promotion: Piece) -> Self {
        Move {
            promotion,
            ..Move::new(from_sq, to_sq, captured)
        }
    }

    pub fn castling(from_sq: usize, to_sq: usize) -> Self {
        Move {
            kind: MoveKind::Castling,
            ..Move::new(from_sq, to_sq, EMPTY)
        }
    }

    pub fn en_passant(from_sq: usize, to_sq: usize, captured: Piece) -> Self {
        Move {
            kind: MoveKind::EnPassant,
            ..Move::new(from_sq, to_sq, captured)
        }
    }

    /// Long algebraic notation (e.g. "e2e4", "e7e8q")
    pub fn to_uci(&self) -> String {
        let mut uci = format!("{}{}", square_name(self.from_sq), square_name(self.to_sq));
        if let Some(c) = piece_to_fen(make_piece(Side::Black, self.promotion)) {
            uci.push(c);
        }
        uci
    }
}

impl SearchMove for Move {
    #[inline]
    fn captured(&self) -> Piece {
        self.captured
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uci())
    }
}

/// State needed to revert one move
#[derive(Clone, Copy, Debug)]
struct UndoInfo {
    mv: Move,
    moved_piece: Piece,
    castling_rights: u8,
    en_passant_square: Option<usize>,
    halfmove_clock: u16,
}

#[derive(Clone, Debug)]
pub struct Board {
    /// 64 squares, 0 = a1 .. 63 = h8
    pub squares: [Piece; NUM_SQUARES],
    pub side_to_move: Side,
    pub castling_rights: u8,
    pub en_passant_square: Option<usize>,
    /// Moves since last pawn move or capture
    pub halfmove_clock: u16,
    pub fullmove_number: u16,
    half_moves_played: usize,
    position_history: Vec<u64>,
    undo_stack: Vec<UndoInfo>,
}

impl Board {
    pub fn new() -> Self {
        Board::from_fen(STARTING_FEN).unwrap_or_else(Board::empty)
    }

    fn empty() -> Self {
        Board {
            squares: [EMPTY; NUM_SQUARES],
            side_to_move: Side::White,
            castling_rights: 0,
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            half_moves_played: 0,
            position_history: Vec::new(),
            undo_stack: Vec::new(),
        }
    }

    /// Parse a FEN string. Missing trailing fields take their defaults.
    pub fn from_fen(fen: &str) -> Option<Self> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        let placement = parts.first()?;
        let mut board = Board::empty();

        let mut rank = BOARD_HEIGHT as i32 - 1;
        let mut file = 0i32;
        for c in placement.chars() {
            if c == '/' {
                rank -= 1;
                file = 0;
            } else if let Some(skip) = c.to_digit(10) {
                file += skip as i32;
            } else {
                let piece = fen_to_piece(c)?;
                if rank < 0 || file >= BOARD_WIDTH as i32 {
                    return None;
                }
                board.squares[rank as usize * BOARD_WIDTH + file as usize] = piece;
                file += 1;
            }
        }

        board.side_to_move = match parts.get(1) {
            Some(&"b") => Side::Black,
            _ => Side::White,
        };

        if let Some(rights) = parts.get(2) {
            for c in rights.chars() {
                board.castling_rights |= match c {
                    'K' => CASTLE_WK,
                    'Q' => CASTLE_WQ,
                    'k' => CASTLE_BK,
                    'q' => CASTLE_BQ,
                    _ => 0,
                };
            }
        }

        board.en_passant_square = parts.get(3).and_then(|s| parse_square(s));
        board.halfmove_clock = parts.get(4).and_then(|s| s.parse().ok()).unwrap_or(0);
        board.fullmove_number = parts.get(5).and_then(|s| s.parse().ok()).unwrap_or(1);
        board.half_moves_played = (board.fullmove_number.max(1) as usize - 1) * 2
            + usize::from(board.side_to_move == Side::Black);

        board.position_history.push(board.compute_hash());
        Some(board)
    }

    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in (0..BOARD_HEIGHT).rev() {
            let mut empty_count = 0;
            for file in 0..BOARD_WIDTH {
                match piece_to_fen(self.squares[rank * BOARD_WIDTH + file]) {
                    Some(c) => {
                        if empty_count > 0 {
                            fen.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        fen.push(c);
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(if self.side_to_move == Side::White { 'w' } else { 'b' });

        fen.push(' ');
        if self.castling_rights == 0 {
            fen.push('-');
        } else {
            let rights = [(CASTLE_WK, 'K'), (CASTLE_WQ, 'Q'), (CASTLE_BK, 'k'), (CASTLE_BQ, 'q')];
            for (mask, c) in rights {
                if self.castling_rights & mask != 0 {
                    fen.push(c);
                }
            }
        }

        fen.push(' ');
        match self.en_passant_square {
            Some(sq) => fen.push_str(&square_name(sq)),
            None => fen.push('-'),
        }

        fen.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        fen
    }

    fn compute_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.squares.hash(&mut hasher);
        self.side_to_move.hash(&mut hasher);
        self.castling_rights.hash(&mut hasher);
        self.en_passant_square.hash(&mut hasher);
        hasher.finish()
    }

    /// Number of moves applied and not yet undone.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Find a legal move from long algebraic notation.
    pub fn parse_move(&self, uci: &str) -> Option<Move> {
        let from_sq = parse_square(uci.get(0..2)?)?;
        let to_sq = parse_square(uci.get(2..4)?)?;
        let promotion = match uci.get(4..5) {
            Some(p) => piece_type(fen_to_piece(p.chars().next()?)?),
            None => EMPTY,
        };
        move_generator::legal_moves(self)
            .into_iter()
            .find(|m| m.from_sq == from_sq && m.to_sq == to_sq && m.promotion == promotion)
    }

    /// Rook relocation for a castling move landing on `king_to`.
    fn castling_rook_squares(king_to: usize) -> Option<(usize, usize)> {
        match king_to {
            6 => Some((7, 5)),
            2 => Some((0, 3)),
            62 => Some((63, 61)),
            58 => Some((56, 59)),
            _ => None,
        }
    }

    /// Square of the pawn removed by an en passant capture landing on `to_sq`.
    fn en_passant_victim(&self, to_sq: usize) -> usize {
        match self.side_to_move {
            Side::White => to_sq - BOARD_WIDTH,
            Side::Black => to_sq + BOARD_WIDTH,
        }
    }

    pub fn apply(&mut self, mv: Move) {
        let piece = self.squares[mv.from_sq];
        self.undo_stack.push(UndoInfo {
            mv,
            moved_piece: piece,
            castling_rights: self.castling_rights,
            en_passant_square: self.en_passant_square,
            halfmove_clock: self.halfmove_clock,
        });

        let kind = piece_type(piece);
        if kind == PAWN || mv.captured != EMPTY {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        match mv.kind {
            MoveKind::EnPassant => {
                let victim = self.en_passant_victim(mv.to_sq);
                self.squares[victim] = EMPTY;
            }
            MoveKind::Castling => {
                if let Some((rook_from, rook_to)) = Self::castling_rook_squares(mv.to_sq) {
                    self.squares[rook_to] = self.squares[rook_from];
                    self.squares[rook_from] = EMPTY;
                }
            }
            MoveKind::Normal => {}
        }

        self.squares[mv.from_sq] = EMPTY;
        self.squares[mv.to_sq] = if mv.promotion != EMPTY {
            make_piece(self.side_to_move, mv.promotion)
        } else {
            piece
        };

        if kind == KING {
            self.castling_rights &= match self.side_to_move {
                Side::White => !(CASTLE_WK | CASTLE_WQ),
                Side::Black => !(CASTLE_BK | CASTLE_BQ),
            };
        }
        for (corner, right) in [(0, CASTLE_WQ), (7, CASTLE_WK), (56, CASTLE_BQ), (63, CASTLE_BK)] {
            if mv.from_sq == corner || mv.to_sq == corner {
                self.castling_rights &= !right;
            }
        }

        self.en_passant_square = None;
        if kind == PAWN && mv.from_sq.abs_diff(mv.to_sq) == 2 * BOARD_WIDTH {
            self.en_passant_square = Some((mv.from_sq + mv.to_sq) / 2);
        }

        if self.side_to_move == Side::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = self.side_to_move.opponent();
        self.half_moves_played += 1;
        self.position_history.push(self.compute_hash());
    }

    /// Revert the last applied move. Does nothing on an empty stack.
    pub fn revert(&mut self) {
        let Some(undo) = self.undo_stack.pop() else {
            return;
        };
        let mv = undo.mv;

        self.position_history.pop();
        self.half_moves_played -= 1;
        self.side_to_move = self.side_to_move.opponent();
        if self.side_to_move == Side::Black {
            self.fullmove_number -= 1;
        }

        self.squares[mv.from_sq] = undo.moved_piece;
        match mv.kind {
            MoveKind::EnPassant => {
                self.squares[mv.to_sq] = EMPTY;
                let victim = self.en_passant_victim(mv.to_sq);
                self.squares[victim] = mv.captured;
            }
            MoveKind::Castling => {
                self.squares[mv.to_sq] = EMPTY;
                if let Some((rook_from, rook_to)) = Self::castling_rook_squares(mv.to_sq) {
                    self.squares[rook_from] = self.squares[rook_to];
                    self.squares[rook_to] = EMPTY;
                }
            }
            MoveKind::Normal => self.squares[mv.to_sq] = mv.captured,
        }

        self.castling_rights = undo.castling_rights;
        self.en_passant_square = undo.en_passant_square;
        self.halfmove_clock = undo.halfmove_clock;
    }

    pub fn find_king(&self, side: Side) -> Option<usize> {
        let king = make_piece(side, KING);
        self.squares.iter().position(|&p| p == king)
    }

    pub fn display(&self) -> String {
        let border = "  +---+---+---+---+---+---+---+---+";
        let mut lines = vec![border.to_string()];
        for rank in (0..BOARD_HEIGHT).rev() {
            let mut row = format!("{} |", rank + 1);
            for file in 0..BOARD_WIDTH {
                let c = piece_to_fen(self.squares[rank * BOARD_WIDTH + file]).unwrap_or(' ');
                row.push_str(&format!(" {} |", c));
            }
            lines.push(row);
            lines.push(border.to_string());
        }
        lines.push("    a   b   c   d   e   f   g   h".to_string());
        lines.join("\n")
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl SearchPosition for Board {
    type Move = Move;

    fn legal_moves(&self) -> Vec<Move> {
        move_generator::legal_moves(self)
    }

    fn make_move(&mut self, mv: Move) {
        self.apply(mv);
    }

    fn undo_move(&mut self) {
        self.revert();
    }

    fn status(&self) -> GameStatus {
        move_generator::status(self)
    }

    fn is_in_check(&self) -> bool {
        move_generator::is_in_check(self, self.side_to_move)
    }

    fn repetition_count(&self) -> usize {
        match self.position_history.last() {
            Some(current) => self.position_history.iter().filter(|&h| h == current).count(),
            None => 1,
        }
    }

    fn king_square(&self, side: Side) -> Option<usize> {
        self.find_king(side)
    }

    fn squares(&self) -> &[Piece] {
        &self.squares
    }

    fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    fn half_moves_played(&self) -> usize {
        self.half_moves_played
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(board: &mut Board, uci: &str) {
        let mv = board.parse_move(uci).expect("legal move");
        board.make_move(mv);
    }

    #[test]
    fn test_fen_round_trip() {
        let fens = [
            STARTING_FEN,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 b - - 3 17",
        ];
        for fen in fens {
            assert_eq!(Board::from_fen(fen).expect("valid fen").to_fen(), fen);
        }
    }

    #[test]
    fn test_make_undo_restores_position() {
        let mut board = Board::new();
        let before = board.to_fen();
        for uci in ["e2e4", "d7d5", "e4d5", "g8f6", "f1b5", "c7c6"] {
            play(&mut board, uci);
        }
        assert_eq!(board.undo_depth(), 6);
        for _ in 0..6 {
            board.undo_move();
        }
        assert_eq!(board.to_fen(), before);
        assert_eq!(board.half_moves_played(), 0);
        assert_eq!(board.repetition_count(), 1);
    }

    #[test]
    fn test_capture_records_victim() {
        let mut board = Board::new();
        play(&mut board, "e2e4");
        play(&mut board, "d7d5");
        let mv = board.parse_move("e4d5").expect("capture");
        assert_eq!(mv.captured(), BLACK_PAWN);
        assert!(mv.is_capture());
    }

    #[test]
    fn test_en_passant_make_undo() {
        let mut board =
            Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").expect("valid fen");
        let before = board.to_fen();
        let mv = board.parse_move("e5d6").expect("en passant");
        assert_eq!(mv.kind, MoveKind::EnPassant);
        assert_eq!(mv.captured, BLACK_PAWN);
        board.make_move(mv);
        assert_eq!(board.squares[parse_square("d5").unwrap_or(0)], EMPTY);
        board.undo_move();
        assert_eq!(board.to_fen(), before);
    }

    #[test]
    fn test_castling_make_undo() {
        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("valid fen");
        let before = board.to_fen();
        let mv = board.parse_move("e1g1").expect("castle");
        assert_eq!(mv.kind, MoveKind::Castling);
        board.make_move(mv);
        assert_eq!(board.squares[5], WHITE_ROOK);
        assert_eq!(board.castling_rights & (CASTLE_WK | CASTLE_WQ), 0);
        board.undo_move();
        assert_eq!(board.to_fen(), before);
    }

    #[test]
    fn test_repetition_count_tracks_history() {
        let mut board = Board::new();
        assert_eq!(board.repetition_count(), 1);
        for _ in 0..2 {
            for uci in ["g1f3", "g8f6", "f3g1", "f6g8"] {
                play(&mut board, uci);
            }
        }
        assert_eq!(board.repetition_count(), 3);
        board.undo_move();
        assert_eq!(board.repetition_count(), 2);
    }

    #[test]
    fn test_half_moves_from_fen() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 10").expect("valid fen");
        assert_eq!(board.half_moves_played(), 19);
    }
}
