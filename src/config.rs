//! Engine configuration: evaluation tables and search/time policy.
//!
//! Both structs deserialize from JSON so tuned values can be loaded at
//! runtime. Missing fields fall back to the defaults below.

use crate::error::ConfigError;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// Pawn table, White's view, rank 1 first
const PAWN_PST: [i32; 64] = [
    0,  0,  0,  0,  0,  0,  0,  0,
    1,  1,  1, -2, -2,  1,  1,  1,
    1, -1, -1,  0,  0, -1, -1,  1,
    0,  0,  0,  2,  2,  0,  0,  0,
    1,  1,  1,  3,  3,  1,  1,  1,
    2,  2,  2,  3,  3,  2,  2,  2,
    5,  5,  5,  5,  5,  5,  5,  5,
    0,  0,  0,  0,  0,  0,  0,  0,
];

const KNIGHT_PST: [i32; 64] = [
   -5, -4, -3, -3, -3, -3, -4, -5,
   -4, -2,  0,  1,  1,  0, -2, -4,
   -3,  1,  1,  2,  2,  1,  1, -3,
   -3,  0,  2,  2,  2,  2,  0, -3,
   -3,  1,  2,  2,  2,  2,  1, -3,
   -3,  0,  1,  2,  2,  1,  0, -3,
   -4, -2,  0,  0,  0,  0, -2, -4,
   -5, -4, -3, -3, -3, -3, -4, -5,
];

const BISHOP_PST: [i32; 64] = [
   -2, -1, -1, -1, -1, -1, -1, -2,
   -1,  1,  0,  0,  0,  0,  1, -1,
   -1,  1,  1,  1,  1,  1,  1, -1,
   -1,  0,  1,  1,  1,  1,  0, -1,
   -1,  1,  1,  1,  1,  1,  1, -1,
   -1,  0,  1,  1,  1,  1,  0, -1,
   -1,  0,  0,  0,  0,  0,  0, -1,
   -2, -1, -1, -1, -1, -1, -1, -2,
];

const KING_LATE_GAME_PST: [i32; 64] = [
   -5, -3, -3, -3, -3, -3, -3, -5,
   -3, -3,  0,  0,  0,  0, -3, -3,
   -3, -1,  2,  3,  3,  2, -1, -3,
   -3, -1,  3,  4,  4,  3, -1, -3,
   -3, -1,  3,  4,  4,  3, -1, -3,
   -3, -1,  2,  3,  3,  2, -1, -3,
   -3, -2, -1,  0,  0, -1, -2, -3,
   -5, -4, -3, -2, -2, -3, -4, -5,
];

/// Static evaluation weights
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Material magnitude per piece type, indexed by `piece_type`
    pub piece_values: [i32; 7],
    pub pawn_table: Vec<i32>,
    pub knight_table: Vec<i32>,
    pub bishop_table: Vec<i32>,
    pub king_table: Vec<i32>,
    /// Pieces at least this valuable earn the safety bonus
    pub strong_piece_threshold: i32,
    pub strong_piece_bonus: i32,
    /// Per enemy piece adjacent to a king
    pub king_pressure_penalty: i32,
    pub in_check_penalty: i32,
    pub repetition_threshold: usize,
    pub repetition_penalty: i32,
    /// Applied at stalemate when the side to move is ahead in material
    pub stalemate_penalty: i32,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            piece_values: [0, 10, 30, 30, 50, 90, 900],
            pawn_table: PAWN_PST.to_vec(),
            knight_table: KNIGHT_PST.to_vec(),
            bishop_table: BISHOP_PST.to_vec(),
            king_table: KING_LATE_GAME_PST.to_vec(),
            strong_piece_threshold: 70,
            strong_piece_bonus: 5,
            king_pressure_penalty: 5,
            in_check_penalty: 15,
            repetition_threshold: 2,
            repetition_penalty: 30,
            stalemate_penalty: 50,
        }
    }
}

impl EvalConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EvalConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (table, values) in [
            ("pawn_table", &self.pawn_table),
            ("knight_table", &self.knight_table),
            ("bishop_table", &self.bishop_table),
            ("king_table", &self.king_table),
        ] {
            if values.len() != NUM_SQUARES {
                return Err(ConfigError::TableSize {
                    table,
                    len: values.len(),
                    expected: NUM_SQUARES,
                });
            }
        }
        Ok(())
    }

    /// Material value signed by owner: White positive, Black negative.
    #[inline]
    pub fn piece_value(&self, piece: Piece) -> i32 {
        let magnitude = self.piece_values[piece_type(piece) as usize];
        match owner(piece) {
            Some(side) => side.sign() * magnitude,
            None => 0,
        }
    }

    /// Positional table for a piece type, if that type has one.
    pub fn positional_table(&self, kind: Piece) -> Option<&[i32]> {
        match kind {
            PAWN => Some(&self.pawn_table),
            KNIGHT => Some(&self.knight_table),
            BISHOP => Some(&self.bishop_table),
            KING => Some(&self.king_table),
            _ => None,
        }
    }
}

/// Iterative deepening and clock policy
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub max_depth: u32,
    /// How many of the best-ordered root moves get shuffled
    pub root_shuffle_width: usize,
    /// Quiescence plies after which the stand-pat score is returned
    pub quiescence_ply_limit: u32,
    pub game_time: Duration,
    pub min_turns_remaining: usize,
    /// Expected game length in moves, used to estimate turns remaining
    pub turn_horizon: usize,
    pub min_budget: Duration,
    pub max_budget: Duration,
    /// Charged to the clock on top of measured time after every decision
    pub move_overhead: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_depth: 8,
            root_shuffle_width: 3,
            quiescence_ply_limit: 16,
            game_time: Duration::from_secs(60),
            min_turns_remaining: 15,
            turn_horizon: 40,
            min_budget: Duration::from_millis(50),
            max_budget: Duration::from_secs(2),
            move_overhead: Duration::from_millis(20),
        }
    }
}

impl SearchConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_value_signed_by_owner() {
        let config = EvalConfig::default();
        assert_eq!(config.piece_value(WHITE_QUEEN), 90);
        assert_eq!(config.piece_value(BLACK_QUEEN), -90);
        assert_eq!(config.piece_value(EMPTY), 0);
    }

    #[test]
    fn test_positional_tables_only_for_some_pieces() {
        let config = EvalConfig::default();
        assert!(config.positional_table(PAWN).is_some());
        assert!(config.positional_table(KING).is_some());
        assert!(config.positional_table(ROOK).is_none());
        assert!(config.positional_table(QUEEN).is_none());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EvalConfig::from_json(r#"{ "in_check_penalty": 40 }"#).expect("valid config");
        assert_eq!(config.in_check_penalty, 40);
        assert_eq!(config.repetition_penalty, 30);
    }

    #[test]
    fn test_short_table_rejected() {
        let err = EvalConfig::from_json(r#"{ "pawn_table": [1, 2, 3] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::TableSize { table: "pawn_table", len: 3, .. }));
    }

    #[test]
    fn test_search_config_json() {
        let config = SearchConfig::from_json(r#"{ "max_depth": 3 }"#).expect("valid config");
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.root_shuffle_width, 3);
        assert_eq!(config.max_budget, Duration::from_secs(2));
    }
}
