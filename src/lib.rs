//! TempoChess - time-bounded move selection
//!
//! A search core that picks a move for a two-player board game within a
//! wall-clock budget:
//! - Iterative deepening with per-depth commitment
//! - Negamax search with alpha-beta pruning
//! - Quiescence search over captures and checks
//! - Hand-tuned static evaluation with positional tables
//! - Game-clock budgeting with cooperative cancellation
//!
//! The engine talks to the game through `position::SearchPosition`; a
//! complete chess implementation is provided in `board`.

pub mod types;
pub mod error;
pub mod config;
pub mod position;
pub mod board;
pub mod move_generator;
pub mod evaluation;
pub mod ordering;
pub mod time_manager;
pub mod search;

pub use board::{Board, Move};
pub use config::{EvalConfig, SearchConfig};
pub use error::{ConfigError, SearchError, SearchResult};
pub use evaluation::Evaluator;
pub use position::{GameStatus, SearchMove, SearchPosition};
pub use search::{SearchEngine, SearchReport, INFINITY, MATE_SCORE};
pub use time_manager::{Deadline, TimeManager};
