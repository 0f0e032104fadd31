//! Piece codes, sides and square geometry shared by the board and the search.
//!
//! A piece is a single byte: the lower 3 bits hold the piece type and
//! bits 3-4 hold the owner. `EMPTY` is the empty-square sentinel.

/// Raw piece code as stored in the square grid.
pub type Piece = u8;

/// Piece type constants (lower 3 bits)
pub const EMPTY: Piece = 0;
pub const PAWN: Piece = 1;
pub const KNIGHT: Piece = 2;
pub const BISHOP: Piece = 3;
pub const ROOK: Piece = 4;
pub const QUEEN: Piece = 5;
pub const KING: Piece = 6;

/// Owner constants (bits 3-4)
pub const WHITE: Piece = 8;
pub const BLACK: Piece = 16;

pub const PIECE_MASK: Piece = 0b111;
pub const COLOR_MASK: Piece = 0b11000;

pub const WHITE_PAWN: Piece = WHITE | PAWN;
pub const WHITE_KNIGHT: Piece = WHITE | KNIGHT;
pub const WHITE_BISHOP: Piece = WHITE | BISHOP;
pub const WHITE_ROOK: Piece = WHITE | ROOK;
pub const WHITE_QUEEN: Piece = WHITE | QUEEN;
pub const WHITE_KING: Piece = WHITE | KING;

pub const BLACK_PAWN: Piece = BLACK | PAWN;
pub const BLACK_KNIGHT: Piece = BLACK | KNIGHT;
pub const BLACK_BISHOP: Piece = BLACK | BISHOP;
pub const BLACK_ROOK: Piece = BLACK | ROOK;
pub const BLACK_QUEEN: Piece = BLACK | QUEEN;
pub const BLACK_KING: Piece = BLACK | KING;

/// Board geometry. Squares are rank-major: index = rank * BOARD_WIDTH + file,
/// rank 0 being White's home rank.
pub const BOARD_WIDTH: usize = 8;
pub const BOARD_HEIGHT: usize = 8;
pub const NUM_SQUARES: usize = BOARD_WIDTH * BOARD_HEIGHT;

/// Castling rights bitmasks
pub const CASTLE_WK: u8 = 1;
pub const CASTLE_WQ: u8 = 2;
pub const CASTLE_BK: u8 = 4;
pub const CASTLE_BQ: u8 = 8;

const FILE_NAMES: &[u8; 8] = b"abcdefgh";

/// The two players. White is the first player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    White,
    Black,
}

impl Side {
    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Owner bits carried by this side's pieces.
    #[inline]
    pub fn color_bits(self) -> Piece {
        match self {
            Side::White => WHITE,
            Side::Black => BLACK,
        }
    }

    /// +1 for White, -1 for Black. Converts owner-absolute scores.
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Side::White => 1,
            Side::Black => -1,
        }
    }
}

#[inline]
pub fn piece_type(piece: Piece) -> Piece {
    piece & PIECE_MASK
}

/// Owner of a non-empty piece.
#[inline]
pub fn owner(piece: Piece) -> Option<Side> {
    match piece & COLOR_MASK {
        WHITE => Some(Side::White),
        BLACK => Some(Side::Black),
        _ => None,
    }
}

#[inline]
pub fn make_piece(side: Side, kind: Piece) -> Piece {
    side.color_bits() | kind
}

#[inline]
pub fn file_of(sq: usize) -> usize {
    sq % BOARD_WIDTH
}

#[inline]
pub fn rank_of(sq: usize) -> usize {
    sq / BOARD_WIDTH
}

/// Square reached from `sq` by a (file, rank) step, if it stays on the board.
#[inline]
pub fn offset_square(sq: usize, df: i32, dr: i32) -> Option<usize> {
    let file = file_of(sq) as i32 + df;
    let rank = rank_of(sq) as i32 + dr;
    if (0..BOARD_WIDTH as i32).contains(&file) && (0..BOARD_HEIGHT as i32).contains(&rank) {
        Some(rank as usize * BOARD_WIDTH + file as usize)
    } else {
        None
    }
}

/// The square seen from the other side of the board (rank flipped).
#[inline]
pub fn mirror_square(sq: usize) -> usize {
    (BOARD_HEIGHT - 1 - rank_of(sq)) * BOARD_WIDTH + file_of(sq)
}

/// Convert a square index to algebraic notation (e.g. "e4")
pub fn square_name(sq: usize) -> String {
    format!("{}{}", FILE_NAMES[file_of(sq)] as char, rank_of(sq) + 1)
}

/// Convert algebraic notation to a square index
pub fn parse_square(name: &str) -> Option<usize> {
    let mut chars = name.chars();
    let file = match chars.next()? {
        c @ 'a'..='h' => c as usize - 'a' as usize,
        _ => return None,
    };
    let rank = match chars.next()? {
        c @ '1'..='8' => c as usize - '1' as usize,
        _ => return None,
    };
    Some(rank * BOARD_WIDTH + file)
}

pub fn fen_to_piece(c: char) -> Option<Piece> {
    let side = if c.is_ascii_uppercase() { Side::White } else { Side::Black };
    let kind = match c.to_ascii_lowercase() {
        'p' => PAWN,
        'n' => KNIGHT,
        'b' => BISHOP,
        'r' => ROOK,
        'q' => QUEEN,
        'k' => KING,
        _ => return None,
    };
    Some(make_piece(side, kind))
}

pub fn piece_to_fen(piece: Piece) -> Option<char> {
    let c = match piece_type(piece) {
        PAWN => 'p',
        KNIGHT => 'n',
        BISHOP => 'b',
        ROOK => 'r',
        QUEEN => 'q',
        KING => 'k',
        _ => return None,
    };
    match owner(piece)? {
        Side::White => Some(c.to_ascii_uppercase()),
        Side::Black => Some(c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_names_round_trip() {
        assert_eq!(square_name(0), "a1");
        assert_eq!(square_name(63), "h8");
        assert_eq!(parse_square("e4"), Some(28));
        assert_eq!(parse_square("i1"), None);
        assert_eq!(parse_square("a"), None);
    }

    #[test]
    fn test_offset_square_stays_on_board() {
        assert_eq!(offset_square(0, -1, 0), None);
        assert_eq!(offset_square(7, 1, 0), None);
        assert_eq!(offset_square(7, 0, 1), Some(15));
        assert_eq!(offset_square(63, 1, 1), None);
    }

    #[test]
    fn test_mirror_square_flips_rank() {
        assert_eq!(mirror_square(0), 56);
        assert_eq!(mirror_square(12), 52);
        assert_eq!(mirror_square(mirror_square(37)), 37);
    }

    #[test]
    fn test_piece_encoding() {
        assert_eq!(fen_to_piece('Q'), Some(WHITE_QUEEN));
        assert_eq!(fen_to_piece('n'), Some(BLACK_KNIGHT));
        assert_eq!(fen_to_piece('x'), None);
        assert_eq!(piece_to_fen(BLACK_KING), Some('k'));
        assert_eq!(owner(EMPTY), None);
        assert_eq!(owner(WHITE_PAWN), Some(Side::White));
        assert_eq!(Side::Black.opponent(), Side::White);
    }
}
