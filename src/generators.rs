//! Move generators: heuristics that may force the next playout move.
//!
//! Generators are polled in order before any random sampling; the first one
//! returning a legal point decides the move. Each fires only with its
//! configured probability so playouts keep some randomness.

use fastrand::Rng;

use crate::board::PointValue;
use crate::constants::{
    PASS_MOVE, PROB_HEURISTIC_CAPTURE, PROB_HEURISTIC_ESCAPE, PROB_HEURISTIC_PAT3,
};
use crate::patterns::pat3_match;
use crate::position::Position;
use crate::tactics::{LibertyReader, TacticalReader};

pub trait MoveGenerator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Called when attached to a position and after it is cleared or resized.
    fn register(&mut self, _position: &Position) {}

    /// Propose a move for the side to move, or `None`.
    fn generate(&mut self, position: &Position, rng: &mut Rng) -> Option<usize>;

    /// Called after every committed move.
    fn update(&mut self, _position: &Position) {}

    fn box_clone(&self) -> Box<dyn MoveGenerator>;
}

impl Clone for Box<dyn MoveGenerator> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// The last move if it was a stone.
fn last_stone(position: &Position) -> Option<usize> {
    position.last_move().filter(|&xy| xy != PASS_MOVE)
}

/// Capture an opponent group left in atari next to the last move.
#[derive(Clone, Debug)]
pub struct CaptureGenerator {
    pub probability: f64,
}

impl Default for CaptureGenerator {
    fn default() -> Self {
        CaptureGenerator {
            probability: PROB_HEURISTIC_CAPTURE,
        }
    }
}

impl MoveGenerator for CaptureGenerator {
    fn name(&self) -> &'static str {
        "capture"
    }

    fn generate(&mut self, position: &Position, rng: &mut Rng) -> Option<usize> {
        let last = last_stone(position)?;
        if rng.f64() >= self.probability {
            return None;
        }
        let enemy = position.to_move.opponent().stone();
        let geo = position.geometry();
        std::iter::once(last)
            .chain(geo.eight(last))
            .filter(|&p| position.board[p] == enemy)
            .find_map(|p| position.single_liberty(p))
            .filter(|&xy| position.is_legal(xy))
    }

    fn box_clone(&self) -> Box<dyn MoveGenerator> {
        Box::new(self.clone())
    }
}

/// Save an own group the last move put in atari, when the reader says it
/// can escape.
#[derive(Clone)]
pub struct AtariEscapeGenerator {
    pub probability: f64,
    /// Leave alone groups placed before the playout started.
    pub ignore_history: bool,
    reader: Box<dyn TacticalReader>,
}

impl Default for AtariEscapeGenerator {
    fn default() -> Self {
        Self::with_reader(Box::new(LibertyReader::default()))
    }
}

impl AtariEscapeGenerator {
    pub fn with_reader(reader: Box<dyn TacticalReader>) -> Self {
        AtariEscapeGenerator {
            probability: PROB_HEURISTIC_ESCAPE,
            ignore_history: false,
            reader,
        }
    }
}

impl MoveGenerator for AtariEscapeGenerator {
    fn name(&self) -> &'static str {
        "atari-escape"
    }

    fn generate(&mut self, position: &Position, rng: &mut Rng) -> Option<usize> {
        let last = last_stone(position)?;
        if rng.f64() >= self.probability {
            return None;
        }
        let own = position.to_move.stone();
        let geo = position.geometry();
        for n in geo.neighbours(last) {
            if position.board[n] != own {
                continue;
            }
            if self.ignore_history && position.is_prehistoric(position.chain[n]) {
                continue;
            }
            if position.single_liberty(n).is_none() {
                continue;
            }
            let verdict = self.reader.read(position, n);
            if verdict.can_catch {
                continue;
            }
            if let Some(xy) = verdict.suggestion.filter(|&xy| position.is_legal(xy)) {
                return Some(xy);
            }
        }
        None
    }

    fn box_clone(&self) -> Box<dyn MoveGenerator> {
        Box::new(self.clone())
    }
}

/// Answer the last move with a point around it matching a 3x3 shape.
#[derive(Clone, Debug)]
pub struct PatternGenerator {
    pub probability: f64,
    candidates: Vec<usize>,
}

impl Default for PatternGenerator {
    fn default() -> Self {
        PatternGenerator {
            probability: PROB_HEURISTIC_PAT3,
            candidates: Vec::with_capacity(8),
        }
    }
}

impl MoveGenerator for PatternGenerator {
    fn name(&self) -> &'static str {
        "pattern"
    }

    fn generate(&mut self, position: &Position, rng: &mut Rng) -> Option<usize> {
        let last = last_stone(position)?;
        if rng.f64() >= self.probability {
            return None;
        }
        let color = position.to_move;
        let geo = position.geometry();
        self.candidates.clear();
        self.candidates.extend(geo.eight(last).into_iter().filter(|&p| {
            position.board[p] == PointValue::Empty && pat3_match(position, p, color)
        }));
        rng.shuffle(&mut self.candidates);
        self.candidates.iter().copied().find(|&xy| position.is_legal(xy))
    }

    fn box_clone(&self) -> Box<dyn MoveGenerator> {
        Box::new(self.clone())
    }
}
