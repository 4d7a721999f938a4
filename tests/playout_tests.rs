//! Property tests over many seeded playouts.
//!
//! Every move of every playout is checked against a from-scratch recount of
//! the board, in both liberty modes.

use fastrand::Rng;

use go_playout::batch;
use go_playout::config::EngineConfig;
use go_playout::constants::PASS_MOVE;
use go_playout::filters::{EyeFilter, SelfAtariFilter};
use go_playout::generators::{AtariEscapeGenerator, CaptureGenerator, PatternGenerator};
use go_playout::playout::{PlayoutState, area_score};
use go_playout::position::{LibertyMode, Position};
use go_playout::selection::MoveSelector;
use go_playout::simulation::Simulation;

fn selector_for(pos: &Position, weighted: bool) -> MoveSelector {
    let mut selector = MoveSelector::new(*pos.geometry(), weighted);
    selector.add_generator(Box::new(CaptureGenerator::default()), pos);
    selector.add_generator(Box::new(AtariEscapeGenerator::default()), pos);
    selector.add_generator(Box::new(PatternGenerator::default()), pos);
    selector.add_filter(Box::new(EyeFilter), pos);
    selector.add_filter(Box::new(SelfAtariFilter::default()), pos);
    selector.register(pos);
    selector
}

/// Play one game move by move, verifying after each, and return the moves.
fn checked_game(
    size: usize,
    mode: LibertyMode,
    weighted: bool,
    seed: u64,
) -> (Vec<usize>, Position) {
    let mut pos = Position::with_mode(size, mode);
    let mut selector = selector_for(&pos, weighted);
    let mut rng = Rng::with_seed(seed);
    let max_moves = 3 * pos.empty_points.len();

    while pos.passes < 2 && pos.move_stack.len() < max_moves {
        let xy = selector.select(&pos, &mut rng);
        assert!(pos.is_legal(xy), "selector chose illegal {xy}");
        pos.play_legal(xy);
        selector.after_move(&pos);

        if let Err(e) = pos.verify() {
            panic!("seed {seed}, move {}: {e}\n{pos}", pos.move_number);
        }
        for xy in pos.geometry().points() {
            assert_eq!(pos.empty_points.contains(xy), !pos.board[xy].is_stone());
        }
        if weighted {
            assert!(selector.weights().is_consistent());
            for xy in pos.geometry().points() {
                assert_eq!(selector.weights().weight(xy) > 0.0, pos.empty_points.contains(xy));
            }
        }
    }
    (pos.move_stack.clone(), pos)
}

#[test]
fn test_incremental_state_matches_recount() {
    env_logger::try_init().ok();
    for seed in 0..12 {
        for mode in [LibertyMode::Exact, LibertyMode::Pseudo] {
            for weighted in [true, false] {
                checked_game(9, mode, weighted, seed);
            }
        }
    }
}

#[test]
fn test_small_boards_stay_consistent() {
    for size in [2, 3, 5, 7] {
        for seed in 0..8 {
            checked_game(size, LibertyMode::Exact, true, seed);
            checked_game(size, LibertyMode::Pseudo, false, seed);
        }
    }
}

#[test]
fn test_liberty_modes_play_identical_games() {
    for seed in 100..106 {
        let (exact_moves, exact) = checked_game(9, LibertyMode::Exact, true, seed);
        let (pseudo_moves, pseudo) = checked_game(9, LibertyMode::Pseudo, true, seed);
        assert_eq!(exact_moves, pseudo_moves, "seed {seed}");
        assert_eq!(exact.board, pseudo.board);
        assert_eq!(exact.checksum(), pseudo.checksum());
        assert_eq!(area_score(&exact), area_score(&pseudo));
    }
}

#[test]
fn test_finished_games_end_in_double_pass() {
    for seed in 0..6 {
        let (moves, pos) = checked_game(9, LibertyMode::Exact, true, seed);
        if pos.passes >= 2 {
            assert_eq!(moves[moves.len() - 2..], [PASS_MOVE, PASS_MOVE]);
            let score = area_score(&pos);
            assert_eq!(area_score(&pos), score);
        }
    }
}

#[test]
fn test_clone_mid_game_equals_source() {
    let config = EngineConfig {
        seed: 31,
        mercy: false,
        ..EngineConfig::default()
    };
    let mut sim = Simulation::with_default_heuristics(config);
    let mut rng = Rng::with_seed(31);
    for _ in 0..20 {
        let Some(xy) = sim.position().empty_points.random(&mut rng) else {
            break;
        };
        if sim.position().is_legal(xy) {
            sim.play(xy).unwrap();
        }
    }

    let mut copy = Simulation::new(EngineConfig::default());
    copy.copy_data_from(&sim);
    assert_eq!(copy.position(), sim.position());
    copy.position().verify().unwrap();

    // The copy plays on without disturbing the source.
    let snapshot = sim.position().clone();
    let result = copy.playout();
    assert_ne!(result.state, PlayoutState::Running);
    assert_eq!(sim.position(), &snapshot);
}

#[test]
fn test_batch_from_midgame_template() {
    let config = EngineConfig {
        seed: 5,
        liberty_mode: LibertyMode::Pseudo,
        ..EngineConfig::default()
    };
    let mut template = Simulation::with_default_heuristics(config);
    for mv in ["E5", "C3", "G7"] {
        let xy = template.position().geometry().parse_coord(mv).unwrap();
        template.play(xy).unwrap();
    }
    let stats = batch::run_parallel(&template, 24);
    assert_eq!(stats.playouts, 24);
    assert_eq!(stats.black_wins + stats.white_wins, 24);
    assert_eq!(template.position().move_number, 3);
}
