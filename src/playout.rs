//! Monte Carlo playouts (random game simulation).
//!
//! A playout asks the [`MoveSelector`] for moves and plays them until the
//! game ends by two passes, by the mercy rule, or by the runaway length cap,
//! then scores the final position.

use fastrand::Rng;
use log::{trace, warn};

use crate::board::{Color, PointValue};
use crate::constants::{LENGTH_FACTOR, MERCY_FACTOR};
use crate::position::Position;
use crate::selection::MoveSelector;

/// Where a playout stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayoutState {
    Running,
    DoublePass,
    Mercy,
    LengthCap,
}

/// Outcome of a finished playout. Scores are from Black's point of view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayoutResult {
    pub state: PlayoutState,
    pub score: f64,
    /// `None` on an exact tie.
    pub winner: Option<Color>,
    /// Moves played during the playout, passes included.
    pub moves: u32,
}

impl PlayoutResult {
    fn new(state: PlayoutState, score: f64, moves: u32) -> Self {
        let winner = if score > 0.0 {
            Some(Color::Black)
        } else if score < 0.0 {
            Some(Color::White)
        } else {
            None
        };
        PlayoutResult {
            state,
            score,
            winner,
            moves,
        }
    }
}

/// Play the position out.
///
/// The position is marked as history first, so generators can tell the
/// stones it started with from those the playout adds. The length cap is
/// [`LENGTH_FACTOR`] times the number of empty points at the start.
pub fn playout(
    position: &mut Position,
    selector: &mut MoveSelector,
    rng: &mut Rng,
    mercy: bool,
) -> PlayoutResult {
    let max_moves = (LENGTH_FACTOR * position.empty_points.len().max(1)) as u32;
    playout_with_limit(position, selector, rng, mercy, max_moves)
}

/// [`playout`] with an explicit length cap: the playout stops once it has
/// played more than `max_moves` moves.
pub fn playout_with_limit(
    position: &mut Position,
    selector: &mut MoveSelector,
    rng: &mut Rng,
    mercy: bool,
    max_moves: u32,
) -> PlayoutResult {
    position.mark_history();
    let start = position.move_number;
    let mercy_threshold = (MERCY_FACTOR * position.size()) as isize;

    let mut state = PlayoutState::Running;
    while state == PlayoutState::Running {
        let xy = selector.select(position, rng);
        position.play_legal(xy);
        selector.after_move(position);

        state = if position.passes >= 2 {
            PlayoutState::DoublePass
        } else if mercy && position.stone_difference().abs() > mercy_threshold {
            PlayoutState::Mercy
        } else if position.move_number - start > max_moves {
            PlayoutState::LengthCap
        } else {
            PlayoutState::Running
        };
    }

    let moves = position.move_number - start;
    let score = match state {
        PlayoutState::Mercy => coarse_score(position),
        _ => area_score(position),
    };
    if state == PlayoutState::LengthCap {
        warn!("playout hit the length cap after {moves} moves");
    }
    trace!("playout finished: {state:?} after {moves} moves, score {score}");
    PlayoutResult::new(state, score, moves)
}

/// Area score from Black's point of view.
///
/// Stones count for their owner; an empty point counts for a color when all
/// of its occupied neighbours have that color, and for nobody when they are
/// mixed or absent. Komi goes to White.
pub fn area_score(position: &Position) -> f64 {
    let geo = position.geometry();
    let mut score = position.stone_difference() as f64 - position.komi;
    for xy in position.empty_points.iter() {
        let mut black = false;
        let mut white = false;
        for n in geo.neighbours(xy) {
            match position.board[n] {
                PointValue::Black => black = true,
                PointValue::White => white = true,
                _ => {}
            }
        }
        match (black, white) {
            (true, false) => score += 1.0,
            (false, true) => score -= 1.0,
            _ => {}
        }
    }
    score
}

/// Stone difference minus komi, used when the mercy rule ends a playout.
pub fn coarse_score(position: &Position) -> f64 {
    position.stone_difference() as f64 - position.komi
}
