//! Static evaluation of a position.
//!
//! Sums material, positional tables (pawn, knight, bishop, king), a small
//! bonus for keeping strong pieces, and a king pressure term. The total is
//! computed from White's side and then converted to the side to move, with
//! penalties for being in check and for repeating positions.

use crate::config::EvalConfig;
use crate::position::SearchPosition;
use crate::types::*;

const KING_NEIGHBOURS: [(i32, i32); 8] = [
    (1, 0), (-1, 0), (0, 1), (0, -1),
    (1, 1), (1, -1), (-1, 1), (-1, -1),
];

/// Hand-tuned evaluator driven by an `EvalConfig`
#[derive(Clone, Debug, Default)]
pub struct Evaluator {
    config: EvalConfig,
}

impl Evaluator {
    pub fn new(config: EvalConfig) -> Self {
        Evaluator { config }
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Score of the position for the side to move (positive = good for it).
    pub fn evaluate<P: SearchPosition>(&self, position: &P) -> i32 {
        let squares = position.squares();
        let mut absolute = 0;

        for (sq, &piece) in squares.iter().enumerate() {
            let Some(side) = owner(piece) else {
                continue;
            };
            absolute += self.square_score(piece, side, sq);
        }

        // Enemy pieces crowding a king count against its owner
        for side in [Side::White, Side::Black] {
            if let Some(king) = position.king_square(side) {
                let pressure = adjacent_enemies(squares, king, side) as i32;
                absolute -= side.sign() * pressure * self.config.king_pressure_penalty;
            }
        }

        let mut score = position.side_to_move().sign() * absolute;

        if position.is_in_check() {
            score -= self.config.in_check_penalty;
        }
        if position.repetition_count() >= self.config.repetition_threshold {
            score -= self.config.repetition_penalty;
        }

        score
    }

    /// Owner-absolute contribution of one occupied square.
    fn square_score(&self, piece: Piece, side: Side, sq: usize) -> i32 {
        let value = self.config.piece_value(piece);
        let mut score = value;

        if let Some(table) = self.config.positional_table(piece_type(piece)) {
            let index = match side {
                Side::White => sq,
                Side::Black => mirror_square(sq),
            };
            score += side.sign() * table[index];
        }

        if value.abs() >= self.config.strong_piece_threshold {
            score += side.sign() * self.config.strong_piece_bonus;
        }

        score
    }

    /// Material balance for the side to move.
    pub fn material<P: SearchPosition>(&self, position: &P) -> i32 {
        let total: i32 = position
            .squares()
            .iter()
            .map(|&piece| self.config.piece_value(piece))
            .sum();
        position.side_to_move().sign() * total
    }
}

/// Squares around `king` occupied by pieces not belonging to `side`.
fn adjacent_enemies(squares: &[Piece], king: usize, side: Side) -> usize {
    KING_NEIGHBOURS
        .iter()
        .filter_map(|&(df, dr)| offset_square(king, df, dr))
        .filter(|&sq| owner(squares[sq]).is_some_and(|o| o != side))
        .count()
}
