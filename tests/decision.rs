//! End-to-end move decisions through the public engine API.

use std::time::Duration;
use tempo_chess::{
    Board, Deadline, EvalConfig, GameStatus, SearchConfig, SearchEngine, SearchPosition,
    MATE_SCORE,
};

fn board(fen: &str) -> Board {
    Board::from_fen(fen).expect("valid fen")
}

fn engine(max_depth: u32) -> SearchEngine {
    let config = SearchConfig {
        max_depth,
        quiescence_ply_limit: 8,
        ..SearchConfig::default()
    };
    SearchEngine::with_config(EvalConfig::default(), config).with_seed(11)
}

fn play(position: &mut Board, moves: &[&str]) {
    for uci in moves {
        let mv = position.parse_move(uci).expect("legal move");
        position.make_move(mv);
    }
}

#[test]
fn selects_mating_move() {
    let fen = "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1";
    let mut position = board(fen);
    let mut engine = engine(3);

    let choice = engine.decide_move(&mut position).expect("legal moves exist");
    assert_eq!(choice.to_uci(), "a1a8");
    assert_eq!(position.to_fen(), fen);

    let report = engine.last_report().expect("report");
    assert!(report.depth >= 1);
    assert_eq!(report.score, MATE_SCORE + (report.depth as i32 - 1));
}

#[test]
fn plays_immediate_mate_over_slower_ones() {
    // Queen and rook against a bare king: several moves mate at once, and
    // many more mate a move later.
    let fens = [
        "k7/8/1K6/8/8/8/8/6QR w - - 0 1",
        "6qr/8/8/8/8/1k6/8/K7 b - - 0 1",
    ];
    for fen in fens {
        for seed in 0..3 {
            let config = SearchConfig {
                max_depth: 3,
                quiescence_ply_limit: 4,
                ..SearchConfig::default()
            };
            let mut engine =
                SearchEngine::with_config(EvalConfig::default(), config).with_seed(seed);
            let mut position = board(fen);

            let choice = engine
                .search_until(&mut position, Deadline::unbounded())
                .expect("legal moves exist");
            position.make_move(choice);
            assert_eq!(position.status(), GameStatus::Checkmate, "{fen} seed {seed}: {choice}");
            position.undo_move();

            let report = engine.last_report().expect("report");
            assert_eq!(report.depth, 3);
            assert_eq!(report.score, MATE_SCORE + 2);
        }
    }
}

#[test]
fn prefers_capturing_undefended_queen() {
    let fen = "4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1";
    let mut position = board(fen);
    let mut engine = engine(2);

    let choice = engine.decide_move(&mut position).expect("legal moves exist");
    assert_eq!(choice.to_uci(), "d1d5");
    assert_eq!(position.to_fen(), fen);
}

#[test]
fn returns_none_without_legal_moves() {
    let mut position = board("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1");
    assert_eq!(engine(3).decide_move(&mut position), None);
}

#[test]
fn falls_back_to_a_legal_move_when_cancelled_immediately() {
    let mut position = Board::new();
    let legal = position.legal_moves();
    let mut engine = engine(8);

    let choice = engine
        .search_until(&mut position, Deadline::new(Duration::ZERO))
        .expect("legal moves exist");
    assert!(legal.contains(&choice));
    assert_eq!(position.undo_depth(), 0);
    assert_eq!(engine.last_report().map(|r| r.depth), Some(0));
}

#[test]
fn decisions_restore_position_and_charge_clock() {
    let mut position = Board::new();
    play(&mut position, &["e2e4", "e7e5", "g1f3", "b8c6"]);
    let fen = position.to_fen();

    let mut engine = engine(8);
    engine.clock_mut().set_remaining(Duration::from_secs(3));
    let before = engine.clock().remaining();

    let choice = engine.decide_move(&mut position).expect("legal moves exist");
    assert!(position.legal_moves().contains(&choice));
    assert_eq!(position.to_fen(), fen);
    assert_eq!(position.undo_depth(), 4);

    let report = engine.last_report().expect("report");
    let overhead = engine.config().move_overhead;
    assert!(report.budget >= engine.config().min_budget);
    assert!(before - engine.clock().remaining() >= report.elapsed + overhead);
}

#[test]
fn new_game_resets_clock() {
    let mut engine = engine(2);
    let mut position = Board::new();
    engine.decide_move(&mut position);
    assert!(engine.clock().remaining() < engine.config().game_time);
    engine.new_game();
    assert_eq!(engine.clock().remaining(), engine.config().game_time);
    assert!(engine.last_report().is_none());
}

#[test]
fn third_repetition_scores_below_first_occurrence() {
    let engine = engine(1);
    let mut position = Board::new();
    let first = engine.evaluate_board(&position);

    let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
    play(&mut position, &shuffle);
    play(&mut position, &shuffle);
    assert_eq!(position.repetition_count(), 3);
    assert!(engine.evaluate_board(&position) < first);
}

#[test]
fn seeded_engines_agree() {
    let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
    let pick = |seed| {
        let config = SearchConfig {
            max_depth: 1,
            ..SearchConfig::default()
        };
        let mut engine = SearchEngine::with_config(EvalConfig::default(), config).with_seed(seed);
        engine
            .search_until(&mut board(fen), Deadline::unbounded())
            .map(|m| m.to_uci())
    };
    assert_eq!(pick(5), pick(5));
}
