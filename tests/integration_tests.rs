//! Integration tests for go-playout
//!
//! Concrete board scenarios run through the public API, each checked in both
//! liberty modes where the behaviour must agree.

use go_playout::board::{Color, PointValue};
use go_playout::config::EngineConfig;
use go_playout::constants::PASS_MOVE;
use go_playout::playout::area_score;
use go_playout::position::{LibertyMode, MoveError, Position};
use go_playout::simulation::Simulation;

const MODES: [LibertyMode; 2] = [LibertyMode::Exact, LibertyMode::Pseudo];

// =============================================================================
// Helper functions for setting up test positions
// =============================================================================

/// Parse a sequence of moves and apply them to a fresh 9x9 position,
/// verifying the incremental state after each one.
/// Moves alternate between Black and White; "pass" can be used to pass.
fn setup_position(mode: LibertyMode, moves: &[&str]) -> Position {
    let mut pos = Position::with_mode(9, mode);
    for mv in moves {
        let xy = pt(&pos, mv);
        pos.play(xy).unwrap_or_else(|e| panic!("{mv}: {e}"));
        pos.verify().unwrap_or_else(|e| panic!("after {mv}: {e}"));
    }
    pos
}

fn pt(pos: &Position, s: &str) -> usize {
    pos.geometry()
        .parse_coord(s)
        .unwrap_or_else(|| panic!("bad coordinate {s}"))
}

/// The ko shape around E5: white E5 is captured by black E4.
const KO_MOVES: [&str; 9] = ["D5", "D4", "F5", "F4", "E6", "E3", "A1", "E5", "E4"];

// =============================================================================
// Ko
// =============================================================================

#[test]
fn test_single_stone_capture_sets_ko() {
    for mode in MODES {
        let mut pos = setup_position(mode, &KO_MOVES);
        let e5 = pt(&pos, "E5");

        assert_eq!(pos.board[e5], PointValue::Empty, "E5 should be captured");
        assert_eq!(pos.last_captures(), &[e5]);
        assert_eq!(pos.ko_point, e5);
        assert!(!pos.is_legal(e5));
        assert_eq!(pos.play(e5), Err(MoveError::Ko));
        assert!(pos.to_string().contains('*'));
    }
}

#[test]
fn test_ko_cleared_after_other_move() {
    for mode in MODES {
        let mut pos = setup_position(mode, &KO_MOVES);
        let e5 = pt(&pos, "E5");

        pos.play(pt(&pos, "J9")).unwrap();
        assert_eq!(pos.ko_point, 0);
        pos.play(pt(&pos, "H1")).unwrap();

        // White may now take back, which makes E4 the new ko.
        pos.play(e5).unwrap();
        pos.verify().unwrap();
        let e4 = pt(&pos, "E4");
        assert_eq!(pos.board[e4], PointValue::Empty);
        assert_eq!(pos.ko_point, e4);
    }
}

#[test]
fn test_capture_of_two_stones_is_not_ko() {
    // White D4-E4 in atari inside black C4 F4 D3 E3 D5; black E5 takes both.
    let moves = ["C4", "D4", "F4", "E4", "D3", "J9", "E3", "J8", "D5", "J7", "E5"];
    for mode in MODES {
        let pos = setup_position(mode, &moves);
        assert_eq!(pos.last_captures().len(), 2);
        assert_eq!(pos.ko_point, 0);
        assert_eq!(pos.stones(Color::White), 3);
    }
}

// =============================================================================
// Captures and liberties
// =============================================================================

#[test]
fn test_filling_last_liberty_removes_stone() {
    for mode in MODES {
        let pos = setup_position(mode, &["C4", "D4", "E4", "J9", "D3", "J8", "D5"]);
        let d4 = pt(&pos, "D4");
        let d5 = pt(&pos, "D5");

        assert_eq!(pos.board[d4], PointValue::Empty);
        assert_eq!(pos.last_captures(), &[d4]);
        assert!(pos.empty_points.contains(d4));
        // D5 has no occupied neighbours left.
        assert_eq!(pos.neighbours[d5], 0);
        assert_eq!(pos.group_liberties(d5), 4 - pos.neighbours[d5] as i32);
    }
}

#[test]
fn test_corner_capture_credits_liberties() {
    for mode in MODES {
        let pos = setup_position(mode, &["B2", "A1", "A2", "H8", "B1"]);
        let a1 = pt(&pos, "A1");
        assert_eq!(pos.board[a1], PointValue::Empty);
        // A2-B2-B1: A3 B3 C2 C1 and the freed A1; A1 is counted twice as a pseudo-liberty.
        let expected = if mode == LibertyMode::Exact { 5 } else { 6 };
        assert_eq!(pos.group_liberties(pt(&pos, "B1")), expected);
    }
}

#[test]
fn test_three_stones_merge_exact_liberties() {
    let pos = setup_position(LibertyMode::Exact, &["C3", "J9", "E3", "J8", "D3"]);
    let group = pos.chain[pt(&pos, "D3")];
    for s in ["C3", "D3", "E3"] {
        assert_eq!(pos.chain[pt(&pos, s)], group);
    }
    // C2 C4 B3, D2 D4, E2 E4 F3.
    assert_eq!(pos.group_liberties(pt(&pos, "C3")), 8);
    assert_eq!(pos.group_size(pt(&pos, "C3")), 3);
}

#[test]
fn test_pseudo_liberties_bound_exact() {
    let moves = ["C3", "J9", "E3", "J8", "D3", "D4", "C4", "E4", "B4"];
    let exact = setup_position(LibertyMode::Exact, &moves);
    let pseudo = setup_position(LibertyMode::Pseudo, &moves);
    assert_eq!(exact.board, pseudo.board);
    assert_eq!(exact.checksum(), pseudo.checksum());
    for xy in exact.geometry().points() {
        if exact.board[xy].is_stone() {
            assert!(pseudo.group_liberties(xy) >= exact.group_liberties(xy));
            assert!(exact.group_liberties(xy) > 0);
        }
    }
}

#[test]
fn test_suicide_of_group_refused() {
    for mode in MODES {
        let mut pos = setup_position(mode, &["A2", "B2", "J9", "A3", "J8", "B1"]);
        // Black A2 is in atari with A1 as the only liberty; filling it is suicide.
        let a1 = pt(&pos, "A1");
        assert_eq!(pos.single_liberty(pt(&pos, "A2")), Some(a1));
        assert_eq!(pos.check_move(a1), Err(MoveError::Suicide));
        // White may fill it: that captures A2.
        pos.pass();
        pos.play(a1).unwrap();
        assert_eq!(pos.board[pt(&pos, "A2")], PointValue::Empty);
        pos.verify().unwrap();
    }
}

// =============================================================================
// Checksum, passes and scoring
// =============================================================================

#[test]
fn test_checksum_depends_on_board_only() {
    let mut pos = setup_position(LibertyMode::Exact, &["B2", "A1", "A2", "H8"]);
    let before = pos.checksum();
    pos.play(pt(&pos, "B1")).unwrap();
    assert_ne!(pos.checksum(), before);
    assert_eq!(pos.checksum_stack.last(), Some(&pos.checksum()));
    assert_eq!(pos.checksum_stack.len(), pos.move_stack.len());

    // Same stones reached without the capture.
    let other = setup_position(LibertyMode::Pseudo, &["B2", "H8", "A2", "pass", "B1"]);
    assert_eq!(other.board, pos.board);
    assert_eq!(other.checksum(), pos.checksum());
}

#[test]
fn test_double_pass_score_is_stable() {
    let mut pos = setup_position(LibertyMode::Exact, &["C3", "G7", "C4", "G6", "pass", "pass"]);
    assert_eq!(pos.passes, 2);
    assert_eq!(pos.move_stack[pos.move_stack.len() - 1], PASS_MOVE);
    let score = area_score(&pos);
    assert_eq!(area_score(&pos), score);
    pos.komi = 0.5;
    assert_eq!(area_score(&pos), score + 7.0);
}

#[test]
fn test_clone_equality() {
    for mode in MODES {
        let source = setup_position(mode, &KO_MOVES);
        let mut copy = Position::with_mode(13, LibertyMode::Exact);
        copy.copy_data_from(&source);
        assert_eq!(copy, source);
        copy.verify().unwrap();
        assert_eq!(copy.clone(), source);
    }
}

// =============================================================================
// Configuration through the simulation
// =============================================================================

#[test]
fn test_simulation_key_value_settings() {
    let mut sim = Simulation::new(EngineConfig::default());
    assert_eq!(sim.set("boardsize", "7"), Ok(true));
    assert_eq!(sim.position().empty_points.len(), 49);
    assert_eq!(sim.set("unknown", "value"), Ok(false));
    assert_eq!(sim.get("boardsize").as_deref(), Some("7"));
    assert!(sim.set("liberties", "both").is_err());

    let xy = pt(sim.position(), "D4");
    sim.play(xy).unwrap();
    assert_eq!(sim.play(xy), Err(MoveError::Occupied));
}
