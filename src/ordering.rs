//! Move ordering for alpha-beta pruning
//!
//! Captures come first, most valuable victim first. At the root a few of
//! the leading moves are shuffled so the engine does not play the same
//! game every time against a fixed opponent.

use crate::config::EvalConfig;
use crate::position::SearchMove;
use rand::seq::SliceRandom;
use rand::Rng;

/// Sort moves by descending captured-piece value. The sort is stable, so
/// quiet moves keep their generation order.
pub fn order_moves<M: SearchMove>(moves: &mut [M], config: &EvalConfig) {
    moves.sort_by_key(|m| std::cmp::Reverse(config.piece_value(m.captured()).abs()));
}

/// Root ordering: capture order, then shuffle the first `width` moves.
pub fn order_root_moves<M: SearchMove, R: Rng + ?Sized>(
    moves: &mut [M],
    config: &EvalConfig,
    width: usize,
    rng: &mut R,
) {
    order_moves(moves, config);
    let top = width.min(moves.len());
    moves[..top].shuffle(rng);
}
