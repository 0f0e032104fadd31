//! The board contract consumed by the search.
//!
//! The engine never interprets game rules itself. It enumerates moves,
//! applies and undoes them, and reads back status and the raw grid through
//! these traits. `crate::board::Board` is the bundled chess implementation.

use crate::types::{Piece, Side};

/// Outcome of the position for the side to move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Checkmate,
    Stalemate,
}

/// A move as seen by the search: only the captured piece matters for
/// ordering and noisy-move classification.
pub trait SearchMove: Copy + PartialEq + std::fmt::Debug {
    /// The piece standing on the destination, or `EMPTY` for a quiet move.
    fn captured(&self) -> Piece;

    #[inline]
    fn is_capture(&self) -> bool {
        self.captured() != crate::types::EMPTY
    }
}

/// A mutable position with a reversible move stack.
///
/// `make_move` and `undo_move` must nest strictly: every `undo_move` reverts
/// the most recent `make_move` that has not been undone yet.
pub trait SearchPosition {
    type Move: SearchMove;

    /// All legal moves for the side to move.
    fn legal_moves(&self) -> Vec<Self::Move>;

    fn make_move(&mut self, mv: Self::Move);

    /// Revert the most recently applied move.
    fn undo_move(&mut self);

    fn status(&self) -> GameStatus;

    /// Whether the side to move is in check.
    fn is_in_check(&self) -> bool;

    /// Occurrences of the current position in the game history, itself included.
    fn repetition_count(&self) -> usize;

    fn king_square(&self, side: Side) -> Option<usize>;

    /// Rank-major square grid, see `crate::types::BOARD_WIDTH`.
    fn squares(&self) -> &[Piece];

    fn side_to_move(&self) -> Side;

    /// Half-moves played since the start of the game.
    fn half_moves_played(&self) -> usize;
}
